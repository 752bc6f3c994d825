//! Command line interface for the MSI bundler.
//!
//! Parses flags, loads the application's cargo metadata, and runs the
//! bundling pipeline.

mod args;

pub use args::Args;

use crate::bundler::{Bundler, SettingsBuilder};
use crate::error::{CliError, Result};
use crate::metadata;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let cargo = args.cargo_command();
    let manifest =
        metadata::load_manifest(&cargo, args.manifest_path.as_deref(), args.package.as_deref())
            .await?;

    let mut builder = SettingsBuilder::new()
        .package_settings(manifest.package)
        .msi_settings(manifest.msi_settings)
        .project_directory(&manifest.project_directory)
        .target_directory(&manifest.target_directory)
        .release(args.release)
        .sign(args.sign)
        .cargo(cargo)
        .wix_directory(&args.wix);
    if let Some(manifest_path) = &args.manifest_path {
        builder = builder.manifest_path(manifest_path);
    }
    if let Some(target) = &args.target {
        builder = builder.target(target.as_str());
    }
    if let Some(work_dir) = &args.work_dir {
        builder = builder.work_directory(work_dir);
    }
    let settings = builder.build()?;

    let artifact = Bundler::new(settings).bundle().await?;

    log::info!("Size: {} bytes", artifact.size);
    log::info!("SHA256: {}", artifact.checksum);
    println!("{}", artifact.path.display());

    Ok(0)
}
