//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that builds the
//! application and hands it to the MSI pipeline.

use crate::bundler::{BundledArtifact, Result, Settings, error::ErrorExt};

use super::{cargo, checksum::calculate_sha256};

/// Main bundler orchestrator.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::{Bundler, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_msi::bundler::Result<()> {
/// let artifact = Bundler::new(settings).bundle().await?;
/// println!("Created {} ({} bytes)", artifact.path.display(), artifact.size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Builds the application and packages it as an MSI.
    ///
    /// Steps run strictly in order and the first failure aborts the run.
    ///
    /// # Returns
    ///
    /// The installer with its size and SHA-256 checksum.
    pub async fn bundle(&self) -> Result<BundledArtifact> {
        cargo::build(&self.settings).await?;

        let path =
            crate::bundler::platform::windows::msi::bundle_project(&self.settings).await?;

        let size = tokio::fs::metadata(&path)
            .await
            .fs_context("reading artifact metadata", &path)?
            .len();
        let checksum = calculate_sha256(&path).await?;

        Ok(BundledArtifact {
            path,
            size,
            checksum,
            signed: self.settings.should_sign(),
        })
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
