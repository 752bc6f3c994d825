//! HTTP utilities for downloading bundler tools.

use super::fs::write_atomically;
use crate::bundler::error::{Error, ErrorExt, Result};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Downloads `url` to `dest`.
///
/// The body is streamed into `dest.partial` and renamed into place once the
/// transfer completes, so an interrupted download never leaves a truncated
/// file at `dest`.
///
/// Used by:
/// - Signer (downloads CodeSignTool)
pub async fn download(url: &str, dest: &Path) -> Result<()> {
    log::info!("Downloading {} -> {}", url, dest.display());

    write_atomically(dest, |partial| async move {
        let mut response = reqwest::get(url).await?.error_for_status()?;

        let mut file = tokio::fs::File::create(&partial)
            .await
            .fs_context("creating download file", &partial)?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .fs_context("writing download", &partial)?;
            written += chunk.len() as u64;
        }
        file.flush().await.fs_context("flushing download", &partial)?;

        log::debug!("Downloaded {} bytes from {}", written, url);
        Ok::<(), Error>(())
    })
    .await
}
