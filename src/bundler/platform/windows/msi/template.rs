//! Built-in WiX installer template.
//!
//! Used when the project does not ship its own `.wxs`. Installs every
//! executable plus the generated fragment into a per-machine program folder,
//! adds a Start menu shortcut for the first executable, and uses the
//! `WixUI_InstallDir` dialog set.

use super::fragment::escape_attr;
use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::{Arch, Settings},
};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Rendered installer artwork, all optional.
#[derive(Clone, Debug, Default)]
pub struct InstallerAssets {
    /// Application icon (.ico).
    pub icon: Option<PathBuf>,
    /// Top banner (.bmp).
    pub banner: Option<PathBuf>,
    /// Dialog background (.bmp).
    pub dialog: Option<PathBuf>,
}

pub const WXS_TEMPLATE: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<!-- Generated by kodegen_bundler_msi -->
<Wix xmlns='http://schemas.microsoft.com/wix/2006/wi'>
    <Product Id='*' Name='{{product_name}}' UpgradeCode='{{upgrade_code}}' Manufacturer='{{manufacturer}}' Language='1033' Codepage='1252' Version='$(var.crate_version)'>
        <Package Id='*' Keywords='Installer' Description='{{description}}' Manufacturer='{{manufacturer}}' InstallerVersion='450' Languages='1033' Compressed='yes' InstallScope='perMachine' SummaryCodepage='1252' Platform='{{platform}}' />
        <MajorUpgrade DowngradeErrorMessage='A newer version of [ProductName] is already installed.' />
        <Media Id='1' Cabinet='media1.cab' EmbedCab='yes' />
{{#if icon}}
        <Icon Id='ProductIcon.ico' SourceFile='{{icon}}' />
        <Property Id='ARPPRODUCTICON' Value='ProductIcon.ico' />
{{/if}}
{{#if homepage}}
        <Property Id='ARPURLINFOABOUT' Value='{{homepage}}' />
{{/if}}
        <Directory Id='TARGETDIR' Name='SourceDir'>
            <Directory Id='{{program_files}}'>
                <Directory Id='APPLICATIONFOLDER' Name='{{product_name}}'>
{{#each executables}}
                    <Component Feature='Complete' Guid='*'>
                        <File Id='exe{{@index}}' Name='{{this.name}}' Source='{{this.source}}' KeyPath='yes'>
{{#if @first}}
                            <Shortcut Id='StartMenuShortcut' Directory='ProgramMenuFolder' Name='{{../product_name}}' WorkingDirectory='APPLICATIONFOLDER'{{#if ../icon}} Icon='ProductIcon.ico'{{/if}} Advertise='yes' />
{{/if}}
                        </File>
                    </Component>
{{/each}}
                    <?include {{fragment}} ?>
                </Directory>
            </Directory>
            <Directory Id='ProgramMenuFolder' />
        </Directory>
        <Feature Id='Complete' Title='{{product_name}}' Level='1' ConfigurableDirectory='APPLICATIONFOLDER' />
{{#if banner}}
        <WixVariable Id='WixUIBannerBmp' Value='{{banner}}' />
{{/if}}
{{#if dialog}}
        <WixVariable Id='WixUIDialogBmp' Value='{{dialog}}' />
{{/if}}
        <Property Id='WIXUI_INSTALLDIR' Value='APPLICATIONFOLDER' />
        <UIRef Id='WixUI_InstallDir' />
    </Product>
</Wix>
"#;

/// Stable UpgradeCode for an identifier.
pub fn upgrade_code(identifier: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, identifier.as_bytes())
        .to_string()
        .to_uppercase()
}

/// Renders the built-in template.
///
/// `staging_dir` holds the stripped executables and `fragment` is the
/// include file name resolved by candle through `-I<work_dir>`.
pub fn render(
    settings: &Settings,
    staging_dir: &Path,
    fragment: &str,
    assets: &InstallerAssets,
) -> Result<String> {
    let executables: Vec<_> = settings
        .executables()
        .iter()
        .filter_map(|exe| exe.file_name())
        .map(|name| {
            json!({
                "name": name.to_string_lossy(),
                "source": staging_dir.join(name).display().to_string(),
            })
        })
        .collect();

    if executables.is_empty() {
        return Err(Error::GenericError("No executables found to bundle".into()));
    }

    let program_files = match settings.binary_arch() {
        Arch::X86 => "ProgramFilesFolder",
        Arch::X86_64 | Arch::AArch64 => "ProgramFiles64Folder",
    };
    let description = if settings.description().is_empty() {
        settings.product_name()
    } else {
        settings.description()
    };
    let display = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());

    let data = json!({
        "product_name": settings.product_name(),
        "manufacturer": settings.manufacturer(),
        "description": description,
        "homepage": settings.homepage(),
        "upgrade_code": upgrade_code(settings.identifier()),
        "platform": settings.binary_arch().wix_platform(),
        "program_files": program_files,
        "executables": executables,
        "fragment": fragment,
        "icon": display(&assets.icon),
        "banner": display(&assets.banner),
        "dialog": display(&assets.dialog),
    });

    render_markup("installer.wxs", WXS_TEMPLATE, &data)
}

/// Renders an XML handlebars template with attribute escaping.
pub(super) fn render_markup<T: Serialize>(name: &str, template: &str, data: &T) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(escape_attr);
    handlebars.set_strict_mode(false);

    handlebars
        .register_template_string(name, template)
        .map_err(|e| Error::GenericError(format!("failed to register {} template: {}", name, e)))?;

    handlebars
        .render(name, data)
        .map_err(|e| Error::GenericError(format!("failed to render {}: {}", name, e)))
}

/// Renders the built-in template into `dest`.
pub async fn write(
    settings: &Settings,
    staging_dir: &Path,
    fragment: &str,
    assets: &InstallerAssets,
    dest: &Path,
) -> Result<()> {
    let wxs = render(settings, staging_dir, fragment, assets)?;
    tokio::fs::write(dest, wxs)
        .await
        .fs_context("writing WiX source", dest)?;
    log::info!("Generated {}", dest.display());
    Ok(())
}
