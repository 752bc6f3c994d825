//! Zip extraction for downloaded tools.

use super::fs::populate_dir_atomically;
use crate::bundler::error::{Error, ErrorExt, Result};
use std::{fs::File, path::Path};

/// Extracts the zip archive at `archive` into the directory `dest`.
///
/// Entries are unpacked into `dest.partial`, which is renamed to `dest`
/// only after every entry was written. Entries whose names would escape the
/// destination are skipped.
pub async fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    log::info!("Extracting {} -> {}", archive.display(), dest.display());

    let archive = archive.to_path_buf();
    populate_dir_atomically(dest, |partial| async move {
        tokio::task::spawn_blocking(move || unpack(&archive, &partial))
            .await
            .map_err(|e| Error::GenericError(format!("Zip extraction task panicked: {}", e)))?
    })
    .await
}

fn unpack(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_path).fs_context("opening archive", archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let outpath = match entry.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => {
                log::warn!("Skipping unsafe zip entry {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).fs_context("creating directory", &outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
            }
            let mut outfile = File::create(&outpath).fs_context("creating file", &outpath)?;
            std::io::copy(&mut entry, &mut outfile).fs_context("extracting file", &outpath)?;
        }
    }

    Ok(())
}
