//! Windows MSI installer creation with the WiX toolset.
//!
//! Packages MinGW-linked GUI applications together with the runtime DLLs,
//! loaders, schemas and icon themes they need at run time.
//!
//! # Module Organization
//!
//! - `dependencies` - runtime DLL discovery from `ntldd` output
//! - `stage` - staging tree assembly
//! - `assets` - icon, banner and dialog rendering
//! - `fragment` - `libraries.wxi` include generation
//! - `template` - built-in `.wxs` template
//! - `toolset` - WiX executable location
//! - `build` - candle and light execution

pub mod assets;
pub mod build;
pub mod dependencies;
pub mod fragment;
pub mod stage;
pub mod template;
pub mod toolset;

use super::sign;
use crate::bundler::{
    builder::tool_detection,
    error::{Context, ErrorExt, Result},
    settings::Settings,
};
use assets::{AssetFormat, AssetJob};
use stage::StagePlan;
use std::path::{Path, PathBuf};
use template::InstallerAssets;

/// Bundle the already built project as an MSI installer.
///
/// # Process
///
/// 1. Check the staging tools are installed
/// 2. Resolve runtime DLLs of the executables and runtime plugins
/// 3. Assemble the staging tree
/// 4. Render the configured artwork
/// 5. Generate `libraries.wxi`
/// 6. Render the built-in `.wxs` unless the project ships one
/// 7. Compile and link with candle and light
/// 8. Sign the installer if requested
///
/// # Returns
///
/// Path to the generated `.msi`
pub async fn bundle_project(settings: &Settings) -> Result<PathBuf> {
    log::info!("Building MSI installer for {}", settings.product_name());

    let msi = settings.msi_settings();
    let mut tools = vec!["ntldd", "strip"];
    if msi.icon.is_some() || msi.banner.is_some() || msi.dialog.is_some() {
        tools.push("rsvg-convert");
    }
    tool_detection::require_all(&tools)?;

    let work_dir = settings.work_directory();
    tokio::fs::create_dir_all(work_dir)
        .await
        .fs_context("creating MSI work directory", work_dir)?;

    let executables = settings.executables();
    let marker = settings.runtime_marker();
    let dependencies =
        dependencies::resolve_all(&executables, &msi.runtime_plugins, marker).await?;
    log::info!("Resolved {} runtime DLLs", dependencies.len());

    let out_dir = settings.staging_directory();
    let plan = StagePlan {
        out_dir: &out_dir,
        executables: &executables,
        dependencies: &dependencies,
        overlays: msi
            .overlays
            .iter()
            .map(|o| (settings.project_path(&o.source), o.destination.clone()))
            .collect(),
        runtime_files: &msi.runtime_files,
    };
    stage::assemble(&plan).await?;

    let installer_assets = render_assets(settings, &out_dir).await?;

    let fragment_path = settings.fragment_path();
    fragment::write(&out_dir, &dependencies, &fragment_path).await?;

    let wxs = match &msi.template {
        Some(template) => settings.project_path(template),
        None => {
            let wxs = work_dir.join(format!("{}.wxs", settings.product_name()));
            let fragment_name = fragment_path
                .file_name()
                .context("fragment path has no file name")?
                .to_string_lossy();
            template::write(settings, &out_dir, &fragment_name, &installer_assets, &wxs).await?;
            wxs
        }
    };

    build::run_candle(settings, &wxs, &installer_assets).await?;
    build::run_light(settings).await?;

    let installer_path = settings.installer_path();
    if settings.should_sign() {
        sign::sign_installer(settings)
            .await
            .context("signing MSI installer")?;
    }

    log::info!("Created MSI installer: {}", installer_path.display());
    Ok(installer_path)
}

/// Renders whichever of icon, banner and dialog are configured.
async fn render_assets(settings: &Settings, out_dir: &Path) -> Result<InstallerAssets> {
    let msi = settings.msi_settings();
    let work_dir = settings.work_directory();
    let mut installer_assets = InstallerAssets::default();

    if let Some(icon) = &msi.icon {
        let output = out_dir.join(settings.icon_file_name());
        assets::render(&AssetJob {
            source: settings.project_path(icon),
            size: assets::ICON_SIZE,
            png: work_dir.join("icon.png"),
            output: output.clone(),
            format: AssetFormat::Ico,
        })
        .await?;
        installer_assets.icon = Some(output);
    }

    if let Some(banner) = &msi.banner {
        let output = work_dir.join("banner.bmp");
        assets::render(&AssetJob {
            source: settings.project_path(banner),
            size: assets::BANNER_SIZE,
            png: work_dir.join("banner.png"),
            output: output.clone(),
            format: AssetFormat::Bmp,
        })
        .await?;
        installer_assets.banner = Some(output);
    }

    if let Some(dialog) = &msi.dialog {
        let output = work_dir.join("dialog.bmp");
        assets::render(&AssetJob {
            source: settings.project_path(dialog),
            size: assets::DIALOG_SIZE,
            png: work_dir.join("dialog.png"),
            output: output.clone(),
            format: AssetFormat::Bmp,
        })
        .await?;
        installer_assets.dialog = Some(output);
    }

    Ok(installer_assets)
}
