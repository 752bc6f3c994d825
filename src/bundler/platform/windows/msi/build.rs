//! WiX compile and link.
//!
//! `candle` compiles the `.wxs` source into a `.wixobj`, resolving
//! `<?include libraries.wxi ?>` through `-I<work_dir>`. `light` links the
//! object with the configured extensions into the `.msi`.

use super::{template::InstallerAssets, toolset};
use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::Settings,
    utils::{command, fs},
};
use std::{ffi::OsString, path::Path};
use tokio::process::Command;

/// Arguments passed to `candle` after the source file.
pub fn candle_args(settings: &Settings, obj: &Path, assets: &InstallerAssets) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![format!("-dcrate_version={}", settings.version_string()).into()];

    for (name, path) in [
        ("icon", &assets.icon),
        ("banner", &assets.banner),
        ("dialog", &assets.dialog),
    ] {
        if let Some(path) = path {
            let mut define = OsString::from(format!("-d{name}="));
            define.push(path);
            args.push(define);
        }
    }

    let mut include = OsString::from("-I");
    include.push(settings.work_directory());
    args.push(include);
    args.push("-out".into());
    args.push(obj.into());
    args
}

/// Arguments passed to `light`.
pub fn light_args(settings: &Settings, obj: &Path, msi: &Path) -> Vec<OsString> {
    let mut args = Vec::new();
    for extension in &settings.msi_settings().extensions {
        args.push("-ext".into());
        args.push(extension.into());
    }
    args.push(obj.into());
    args.push("-out".into());
    args.push(msi.into());
    args
}

/// Runs `candle` on `wxs`, producing [`Settings::object_path`].
pub async fn run_candle(settings: &Settings, wxs: &Path, assets: &InstallerAssets) -> Result<()> {
    if !wxs.exists() {
        return Err(Error::MissingFile(wxs.to_path_buf()));
    }

    log::info!("Running candle on {}", wxs.display());
    let candle = toolset::wix_tool(settings.wix_directory(), "candle")?;
    let obj = settings.object_path();
    fs::remove_file(&obj).await?;

    command::run(
        Command::new(candle)
            .arg(wxs)
            .args(candle_args(settings, &obj, assets)),
        "candle",
    )
    .await
}

/// Runs `light` on [`Settings::object_path`], producing
/// [`Settings::installer_path`].
pub async fn run_light(settings: &Settings) -> Result<()> {
    let obj = settings.object_path();
    if !obj.exists() {
        return Err(Error::MissingFile(obj));
    }

    let msi = settings.installer_path();
    if let Some(parent) = msi.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating installer output directory", parent)?;
    }
    fs::remove_file(&msi).await?;

    log::info!("Running light to create {}", msi.display());
    let light = toolset::wix_tool(settings.wix_directory(), "light")?;
    command::run(
        Command::new(light).args(light_args(settings, &obj, &msi)),
        "light",
    )
    .await
}
