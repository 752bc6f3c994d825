//! Package metadata from `cargo metadata`.
//!
//! Reads the application's package, its `bin` targets, the cargo target
//! directory and the `[package.metadata.bundle.msi]` table.

use crate::bundler::{MsiSettings, PackageSettings};
use crate::error::{BundlerError, CliError, Result};
use anyhow::Context as _;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Output of `cargo metadata --format-version 1 --no-deps`.
#[derive(Debug, Deserialize)]
struct CargoMetadata {
    packages: Vec<MetadataPackage>,
    target_directory: PathBuf,
}

#[derive(Debug, Deserialize)]
struct MetadataPackage {
    name: String,
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    homepage: Option<String>,
    manifest_path: PathBuf,
    #[serde(default)]
    targets: Vec<MetadataTarget>,
    #[serde(default)]
    metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct MetadataTarget {
    name: String,
    kind: Vec<String>,
}

/// Everything the bundler needs to know about the application.
#[derive(Debug, Clone)]
pub struct CargoManifest {
    /// Package metadata ([package] section plus `bin` targets)
    pub package: PackageSettings,

    /// Directory holding the package's Cargo.toml
    pub project_directory: PathBuf,

    /// Cargo target directory
    pub target_directory: PathBuf,

    /// MSI settings (from [package.metadata.bundle.msi], defaults otherwise)
    pub msi_settings: MsiSettings,
}

/// Runs `cargo metadata` and loads the selected package.
///
/// `cargo` holds the command words, `package` picks a package in a
/// multi-package workspace.
pub async fn load_manifest(
    cargo: &[String],
    manifest_path: Option<&Path>,
    package: Option<&str>,
) -> Result<CargoManifest> {
    let (program, extra) = cargo.split_first().ok_or_else(|| CliError::InvalidArguments {
        reason: "cargo command is empty".to_string(),
    })?;

    let mut cmd = Command::new(program);
    cmd.args(extra)
        .args(["metadata", "--format-version", "1", "--no-deps"]);
    if let Some(manifest_path) = manifest_path {
        cmd.arg("--manifest-path").arg(manifest_path);
    }
    cmd.stderr(std::process::Stdio::inherit());

    log::debug!("Running {:?}", cmd.as_std());
    let output = cmd
        .output()
        .await
        .with_context(|| format!("failed to run `{} metadata`", program))?;

    if !output.status.success() {
        return Err(CliError::ExecutionFailed {
            command: "cargo metadata".to_string(),
            reason: format!("exited with {}", output.status),
        }
        .into());
    }

    let json = String::from_utf8(output.stdout).context("cargo metadata output is not UTF-8")?;
    parse_manifest(&json, package)
}

/// Selects a package from `cargo metadata` JSON and extracts its settings.
pub fn parse_manifest(json: &str, package: Option<&str>) -> Result<CargoManifest> {
    let metadata: CargoMetadata = serde_json::from_str(json)?;
    let selected = select_package(&metadata.packages, package)?;

    let project_directory = selected
        .manifest_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| CliError::InvalidArguments {
            reason: format!("invalid manifest path {}", selected.manifest_path.display()),
        })?;

    let msi_settings = match selected.metadata.pointer("/bundle/msi") {
        Some(table) => serde_json::from_value(table.clone())
            .context("invalid [package.metadata.bundle.msi] table")?,
        None => {
            log::debug!("No [package.metadata.bundle.msi] table, using defaults");
            MsiSettings::default()
        }
    };

    let binaries: Vec<String> = selected
        .targets
        .iter()
        .filter(|t| t.kind.iter().any(|k| k == "bin"))
        .map(|t| t.name.clone())
        .collect();

    if binaries.is_empty() && msi_settings.executables.is_empty() {
        return Err(CliError::InvalidArguments {
            reason: format!("package {} has no binary targets", selected.name),
        }
        .into());
    }

    Ok(CargoManifest {
        package: PackageSettings {
            product_name: selected.name.clone(),
            version: selected.version.clone(),
            description: selected.description.clone().unwrap_or_default(),
            homepage: selected.homepage.clone(),
            authors: selected.authors.clone(),
            binaries,
        },
        project_directory,
        target_directory: metadata.target_directory,
        msi_settings,
    })
}

/// Picks the package named `name`, or the only package when no name is given.
fn select_package<'a>(
    packages: &'a [MetadataPackage],
    name: Option<&str>,
) -> Result<&'a MetadataPackage> {
    match name {
        Some(name) => packages.iter().find(|p| p.name == name).ok_or_else(|| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: format!("package {} not found in workspace", name),
            })
        }),
        None => match packages {
            [only] => Ok(only),
            [] => Err(CliError::InvalidArguments {
                reason: "no packages found".to_string(),
            }
            .into()),
            _ => Err(CliError::MissingArgument {
                argument: "--package (workspace has several packages)".to_string(),
            }
            .into()),
        },
    }
}
