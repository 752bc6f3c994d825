//! Platform-specific packaging.

pub mod windows;

use std::path::PathBuf;

/// A finished installer package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Path to the package.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Lowercase hex SHA-256 of the package.
    pub checksum: String,
    /// Whether the package went through the signer.
    pub signed: bool,
}
