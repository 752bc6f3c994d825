//! Windows MSI settings.

use std::path::PathBuf;

/// Default download location of SSL.com's CodeSignTool.
pub const CODESIGNTOOL_URL: &str = "https://www.ssl.com/download/codesigntool-for-windows";

const ADWAITA_FILES: &[&str] = &[
    "index.theme",
    "scalable/actions/open-menu-symbolic.svg",
    "scalable/ui/window-close-symbolic.svg",
    "scalable/ui/window-maximize-symbolic.svg",
    "scalable/ui/window-minimize-symbolic.svg",
    "scalable/ui/window-restore-symbolic.svg",
    "scalable/actions/edit-delete-symbolic.svg",
    "scalable/actions/go-previous-symbolic.svg",
    "scalable/actions/list-remove-symbolic.svg",
    "scalable/actions/list-add-symbolic.svg",
    "scalable/actions/edit-find-symbolic.svg",
];

/// MSI installer configuration.
///
/// # Configuration
///
/// Add to the application's `Cargo.toml`:
///
/// ```toml
/// [package.metadata.bundle.msi]
/// icon = "data/icons/scalable/apps/com.example.App.svg"
/// banner = "windows/banner.svg"
/// dialog = "windows/dialog.svg"
/// template = "windows/app.wxs"
/// manufacturer = "Example Inc."
///
/// [[package.metadata.bundle.msi.overlays]]
/// source = "data/icons"
/// destination = "share/icons/Adwaita"
/// ```
///
/// Relative paths resolve against the directory holding `Cargo.toml`, except
/// `runtime_plugins` and `runtime_files` which resolve against the runtime
/// root discovered from `ntldd` output.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct MsiSettings {
    /// Executables to package, by `bin` target name.
    ///
    /// Default: Empty (every `bin` target of the package)
    pub executables: Vec<String>,

    /// Runtime distribution directory searched for in `ntldd` output.
    ///
    /// Default: None (derived from the target architecture, e.g. `mingw32`)
    pub runtime_marker: Option<String>,

    /// Runtime libraries loaded with `LoadLibrary` at run time whose
    /// dependencies static analysis of the executables cannot see.
    ///
    /// Default: the gdk-pixbuf SVG loader
    pub runtime_plugins: Vec<PathBuf>,

    /// Files and directories copied from the runtime root into the staging
    /// tree at the same relative path.
    ///
    /// Default: GTK settings schema, hicolor/Adwaita theme indexes,
    /// Adwaita symbolic icons, p11-kit and gdk-pixbuf loaders
    pub runtime_files: Vec<PathBuf>,

    /// Project directories copied into the staging tree.
    ///
    /// Default: Empty
    pub overlays: Vec<Overlay>,

    /// Application icon (SVG), rendered to `<product>.ico`.
    ///
    /// Default: None
    pub icon: Option<PathBuf>,

    /// Installer banner (SVG, rendered at 493×58) to `banner.bmp`.
    ///
    /// Default: None
    pub banner: Option<PathBuf>,

    /// Installer dialog background (SVG, rendered at 493×312) to `dialog.bmp`.
    ///
    /// Default: None
    pub dialog: Option<PathBuf>,

    /// Path to a custom WiX template (.wxs file).
    ///
    /// Default: None (uses built-in template)
    pub template: Option<PathBuf>,

    /// Manufacturer shown in Add/Remove Programs.
    ///
    /// Default: None (first package author, or the product name)
    pub manufacturer: Option<String>,

    /// Reverse-DNS identifier; seeds the package UpgradeCode.
    ///
    /// Default: None (product name)
    pub identifier: Option<String>,

    /// WiX extensions passed to `light`.
    ///
    /// Default: `["WixUIExtension"]`
    pub extensions: Vec<String>,

    /// Code signing settings.
    pub sign: SignSettings,
}

impl Default for MsiSettings {
    fn default() -> Self {
        let runtime_files = [
            "share/glib-2.0/schemas/org.gtk.Settings.FileChooser.gschema.xml",
            "share/icons/hicolor/index.theme",
            "lib/p11-kit",
            "lib/gdk-pixbuf-2.0",
        ]
        .into_iter()
        .map(PathBuf::from)
        .chain(
            ADWAITA_FILES
                .iter()
                .map(|f| PathBuf::from("share/icons/Adwaita").join(f)),
        )
        .collect();

        Self {
            executables: Vec::new(),
            runtime_marker: None,
            runtime_plugins: vec![PathBuf::from(
                "lib/gdk-pixbuf-2.0/2.10.0/loaders/libpixbufloader-svg.dll",
            )],
            runtime_files,
            overlays: Vec::new(),
            icon: None,
            banner: None,
            dialog: None,
            template: None,
            manufacturer: None,
            identifier: None,
            extensions: vec!["WixUIExtension".to_string()],
            sign: SignSettings::default(),
        }
    }
}

/// A project directory mirrored into the staging tree.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Overlay {
    /// Directory in the project.
    pub source: PathBuf,
    /// Destination relative to the staging root.
    pub destination: PathBuf,
}

/// CodeSignTool configuration.
///
/// Credentials are never configured here; they come from the
/// `SSL_COM_*` environment variables at signing time.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct SignSettings {
    /// Program name embedded in the signature.
    ///
    /// Default: None (product name)
    pub program_name: Option<String>,

    /// Download URL of the CodeSignTool zip.
    pub tool_url: String,
}

impl Default for SignSettings {
    fn default() -> Self {
        Self {
            program_name: None,
            tool_url: CODESIGNTOOL_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runtime_files_cover_gtk_assets() {
        let settings = MsiSettings::default();
        assert_eq!(settings.runtime_files.len(), 4 + ADWAITA_FILES.len());
        assert!(
            settings
                .runtime_files
                .contains(&PathBuf::from("share/icons/Adwaita/index.theme"))
        );
        assert!(settings.runtime_files.contains(&PathBuf::from("lib/p11-kit")));
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let settings: MsiSettings = serde_json::from_value(serde_json::json!({
            "icon": "app.svg",
            "runtime_marker": "ucrt64",
        }))
        .unwrap();
        assert_eq!(settings.icon, Some(PathBuf::from("app.svg")));
        assert_eq!(settings.runtime_marker.as_deref(), Some("ucrt64"));
        assert_eq!(settings.extensions, vec!["WixUIExtension".to_string()]);
        assert_eq!(settings.sign.tool_url, CODESIGNTOOL_URL);
    }
}
