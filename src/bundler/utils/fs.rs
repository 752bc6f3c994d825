//! File system utilities for bundling.
//!
//! Provides copy operations with automatic directory creation and the
//! rename-based commit used for resumable downloads.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    future::Future,
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Suffix for in-progress artifacts that are renamed into place on success.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Returns `path` with [`PARTIAL_SUFFIX`] appended to its file name.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Removes the file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::MissingFile(from.to_path_buf()));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying", from)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Symlinks are copied as the files they point to. Existing files at the
/// destination are overwritten.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::MissingFile(from.to_path_buf()));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        for entry in walkdir::WalkDir::new(&from).follow_links(true) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)
                    .fs_context("creating directory", &dest_path)?;
            } else {
                if let Some(parent) = dest_path.parent() {
                    std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
                }
                std::fs::copy(entry.path(), &dest_path).fs_context("copying", entry.path())?;
            }
        }
        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Renames `from` to `to`, replacing a file at `to`.
pub async fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).await.fs_context("renaming", from)
}

/// Copies a file or a whole directory tree.
pub async fn copy_path(from: &Path, to: &Path) -> Result<()> {
    log::info!("Copy {} -> {}", from.display(), to.display());
    if from.is_dir() {
        copy_dir(from, to).await
    } else {
        copy_file(from, to).await
    }
}

/// Produces `dest` through `write`, committing it with a rename.
///
/// `write` receives the `.partial` path to fill. A stale partial from an
/// earlier interrupted run is removed first. If `write` fails the partial is
/// removed and `dest` is left untouched, so `dest` only ever holds complete
/// output.
pub async fn write_atomically<F, Fut>(dest: &Path, write: F) -> Result<()>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let partial = partial_path(dest);
    remove_file(&partial).await?;

    if let Err(e) = write(partial.clone()).await {
        remove_file(&partial).await?;
        return Err(e);
    }

    rename(&partial, dest).await
}

/// Produces the directory `dest` through `populate`, committing it with a rename.
///
/// `populate` receives an empty `.partial` directory. A stale partial
/// directory is removed first and on failure.
pub async fn populate_dir_atomically<F, Fut>(dest: &Path, populate: F) -> Result<()>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let partial = partial_path(dest);
    create_dir_all(&partial, true).await?;

    if let Err(e) = populate(partial.clone()).await {
        remove_dir_all(&partial).await?;
        return Err(e);
    }

    rename(&partial, dest).await
}
