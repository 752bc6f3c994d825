//! Builder for constructing Settings.

use super::{MsiSettings, PackageSettings, Settings};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Default WiX v3 installation directory.
pub const DEFAULT_WIX_DIRECTORY: &str = "C:/Program Files (x86)/WiX Toolset v3.11";

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_msi::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_directory("/src/app")
///     .target_directory("/src/app/target")
///     .package_settings(PackageSettings {
///         product_name: "my-app".into(),
///         version: "1.0.0".into(),
///         binaries: vec!["my-app".into()],
///         ..Default::default()
///     })
///     .release(true)
///     .target("i686-pc-windows-gnu")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    package_settings: Option<PackageSettings>,
    msi_settings: MsiSettings,
    project_directory: Option<PathBuf>,
    target_directory: Option<PathBuf>,
    work_directory: Option<PathBuf>,
    target: Option<String>,
    release: bool,
    sign: bool,
    cargo: Vec<String>,
    manifest_path: Option<PathBuf>,
    wix_directory: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets package metadata.
    ///
    /// # Required
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets the `[package.metadata.bundle.msi]` configuration.
    ///
    /// Default: [`MsiSettings::default`]
    pub fn msi_settings(mut self, settings: MsiSettings) -> Self {
        self.msi_settings = settings;
        self
    }

    /// Sets the directory holding the application's Cargo.toml.
    ///
    /// # Required
    pub fn project_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the cargo target directory.
    ///
    /// # Required
    pub fn target_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.target_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the working directory.
    ///
    /// Default: `<target_directory>/msi`
    pub fn work_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.work_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the target triple.
    ///
    /// Default: None (host architecture, cargo's default output directory)
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Build in release mode.
    pub fn release(mut self, release: bool) -> Self {
        self.release = release;
        self
    }

    /// Sign the installer after linking.
    pub fn sign(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }

    /// Sets the build command words.
    ///
    /// Default: `["cargo"]`
    pub fn cargo(mut self, cargo: Vec<String>) -> Self {
        self.cargo = cargo;
        self
    }

    /// Sets the manifest path forwarded to cargo.
    pub fn manifest_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.manifest_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the WiX toolset directory.
    ///
    /// Default: [`DEFAULT_WIX_DIRECTORY`]
    pub fn wix_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.wix_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `package_settings`, `project_directory` or
    /// `target_directory` is missing, or if the product name is empty.
    ///
    /// A relative work directory is resolved against the current directory,
    /// since external tools run with other working directories.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::{Context, ErrorExt};

        let package = self.package_settings.context("package_settings is required")?;
        if package.product_name.is_empty() {
            crate::bail!("product name must not be empty");
        }
        let target_directory = self
            .target_directory
            .context("target_directory is required")?;
        let work_directory = self
            .work_directory
            .unwrap_or_else(|| target_directory.join("msi"));
        let work_directory = work_directory
            .absolutize()
            .fs_context("resolving work directory", &work_directory)?
            .into_owned();
        let cargo = if self.cargo.is_empty() {
            vec!["cargo".to_string()]
        } else {
            self.cargo
        };

        Ok(Settings::new(
            package,
            self.msi_settings,
            self.project_directory
                .context("project_directory is required")?,
            target_directory,
            work_directory,
            self.target,
            self.release,
            self.sign,
            cargo,
            self.manifest_path,
            self.wix_directory
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WIX_DIRECTORY)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> PackageSettings {
        PackageSettings {
            product_name: "keyboard-configurator".into(),
            version: "1.3.0".into(),
            binaries: vec!["system76-keyboard-configurator".into()],
            ..Default::default()
        }
    }

    #[test]
    fn derives_layout_from_target_directory() {
        let settings = SettingsBuilder::new()
            .package_settings(package())
            .project_directory("/p")
            .target_directory("/p/target")
            .release(true)
            .target("i686-pc-windows-gnu")
            .build()
            .unwrap();

        assert_eq!(
            settings.executables(),
            vec![PathBuf::from(
                "/p/target/i686-pc-windows-gnu/release/system76-keyboard-configurator.exe"
            )]
        );
        assert_eq!(settings.work_directory(), Path::new("/p/target/msi"));
        assert_eq!(
            settings.installer_path(),
            PathBuf::from("/p/target/msi/keyboard-configurator.msi")
        );
        assert_eq!(settings.runtime_marker(), "mingw32");
        assert_eq!(settings.cargo_command(), ["cargo".to_string()]);
        assert_eq!(settings.wix_directory(), Path::new(DEFAULT_WIX_DIRECTORY));
    }

    #[test]
    fn configured_executables_override_bin_targets() {
        let settings = SettingsBuilder::new()
            .package_settings(package())
            .msi_settings(MsiSettings {
                executables: vec!["helper.exe".into()],
                ..Default::default()
            })
            .project_directory("/p")
            .target_directory("/p/target")
            .build()
            .unwrap();

        assert_eq!(
            settings.executables(),
            vec![PathBuf::from("/p/target/debug/helper.exe")]
        );
    }

    #[test]
    fn relative_work_directory_is_made_absolute() {
        let settings = SettingsBuilder::new()
            .package_settings(package())
            .project_directory("/p")
            .target_directory("/p/target")
            .work_directory("build/msi")
            .build()
            .unwrap();

        let msi = settings.installer_path();
        assert!(msi.is_absolute(), "{}", msi.display());
        assert!(msi.ends_with("build/msi/keyboard-configurator.msi"));
        assert!(settings.sign_directory().is_absolute());
    }

    #[test]
    fn missing_package_is_an_error() {
        let result = SettingsBuilder::new()
            .project_directory("/p")
            .target_directory("/p/target")
            .build();
        assert!(result.is_err());
    }
}
