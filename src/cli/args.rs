//! Command line argument parsing and validation.

use crate::bundler::DEFAULT_WIX_DIRECTORY;
use clap::Parser;
use std::path::PathBuf;

/// Windows MSI bundler for MinGW-linked Rust applications
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_msi",
    version,
    about = "Windows MSI bundler for MinGW-linked Rust applications",
    long_about = "Builds the application with cargo, collects the MinGW runtime DLLs and data files it
needs, and links an .msi with the WiX toolset. Optionally signs the package with SSL.com
CodeSignTool (credentials from SSL_COM_CREDENTIAL_ID, SSL_COM_USERNAME, SSL_COM_PASSWORD
and SSL_COM_TOTP_SECRET).

Usage:
  kodegen_bundler_msi --release
  kodegen_bundler_msi --release --sign --package my-app
  kodegen_bundler_msi --cargo \"cargo +nightly\" --wix \"C:/WiX\"

Exit code 0 = package exists at <work-dir>/<product>.msi."
)]
pub struct Args {
    /// Build with --release and package target/release
    #[arg(long)]
    pub release: bool,

    /// Sign the package with CodeSignTool
    #[arg(long)]
    pub sign: bool,

    /// Build command, split on whitespace
    #[arg(long, value_name = "CMD", default_value = "cargo")]
    pub cargo: String,

    /// WiX toolset installation directory
    #[arg(long, value_name = "DIR", env = "WIX", default_value = DEFAULT_WIX_DIRECTORY)]
    pub wix: PathBuf,

    /// Path to the application's Cargo.toml
    #[arg(long, value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,

    /// Package to bundle in a multi-package workspace
    #[arg(short, long, value_name = "NAME")]
    pub package: Option<String>,

    /// Target triple to build for, e.g. i686-pc-windows-gnu
    #[arg(long, value_name = "TRIPLE")]
    pub target: Option<String>,

    /// Working directory [default: <target-dir>/msi]
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build command words.
    pub fn cargo_command(&self) -> Vec<String> {
        self.cargo.split_whitespace().map(String::from).collect()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.cargo_command().is_empty() {
            return Err("--cargo cannot be empty".to_string());
        }

        if let Some(manifest) = &self.manifest_path {
            if !manifest.is_file() {
                return Err(format!("Manifest not found: {}", manifest.display()));
            }
        }

        if self.package.as_deref() == Some("") {
            return Err("--package cannot be empty".to_string());
        }

        Ok(())
    }
}
