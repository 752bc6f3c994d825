//! Core Settings struct and implementations.

use super::{Arch, MsiSettings, PackageSettings};
use std::path::{Path, PathBuf};

/// Main settings for bundler operations.
///
/// Central configuration for the bundler, constructed via [`SettingsBuilder`](super::SettingsBuilder).
/// Paths derived here define the working layout:
///
/// ```text
/// <work_dir>/
/// ├── out/              staged file tree
/// ├── libraries.wxi     generated WiX fragment
/// ├── banner.bmp
/// ├── dialog.bmp
/// ├── <product>.wixobj
/// ├── <product>.msi
/// └── sign/             cached CodeSignTool
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    package: PackageSettings,
    msi: MsiSettings,

    /// Directory holding the application's Cargo.toml.
    project_directory: PathBuf,

    /// Cargo target directory.
    target_directory: PathBuf,

    work_directory: PathBuf,

    /// Target triple passed to `cargo build --target`, if any.
    target: Option<String>,

    release: bool,
    sign: bool,

    /// Build command words, e.g. `["cargo", "+nightly"]`.
    cargo: Vec<String>,

    manifest_path: Option<PathBuf>,

    /// WiX toolset installation directory.
    wix_directory: PathBuf,
}

impl Settings {
    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.package.product_name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the package description.
    pub fn description(&self) -> &str {
        &self.package.description
    }

    /// Returns the project homepage, if the package declares one.
    pub fn homepage(&self) -> Option<&str> {
        self.package.homepage.as_deref()
    }

    /// Returns the package metadata.
    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    /// Returns the MSI configuration.
    pub fn msi_settings(&self) -> &MsiSettings {
        &self.msi
    }

    /// Detects the binary architecture from the target triple, or the host
    /// architecture when no target was given.
    pub fn binary_arch(&self) -> Arch {
        match &self.target {
            Some(target) => Arch::from_target(target),
            None => Arch::from_target(std::env::consts::ARCH),
        }
    }

    /// Runtime distribution marker searched for in `ntldd` output.
    pub fn runtime_marker(&self) -> &str {
        self.msi
            .runtime_marker
            .as_deref()
            .unwrap_or_else(|| self.binary_arch().runtime_marker())
    }

    /// Returns the target triple, if cross compiling.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Whether to build with `--release`.
    pub fn is_release(&self) -> bool {
        self.release
    }

    /// Whether the installer should be signed.
    pub fn should_sign(&self) -> bool {
        self.sign
    }

    /// Returns the build command words.
    pub fn cargo_command(&self) -> &[String] {
        &self.cargo
    }

    /// Returns the `--manifest-path` forwarded to cargo.
    pub fn manifest_path(&self) -> Option<&Path> {
        self.manifest_path.as_deref()
    }

    /// Returns the project directory.
    pub fn project_directory(&self) -> &Path {
        &self.project_directory
    }

    /// Directory cargo writes the executables to.
    ///
    /// `<target>/[<triple>/](release|debug)`
    pub fn profile_directory(&self) -> PathBuf {
        let mut dir = self.target_directory.clone();
        if let Some(triple) = &self.target {
            dir.push(triple);
        }
        dir.push(if self.release { "release" } else { "debug" });
        dir
    }

    /// Names of the executables to package.
    pub fn executable_names(&self) -> &[String] {
        if self.msi.executables.is_empty() {
            &self.package.binaries
        } else {
            &self.msi.executables
        }
    }

    /// Full paths of the built executables.
    pub fn executables(&self) -> Vec<PathBuf> {
        let dir = self.profile_directory();
        self.executable_names()
            .iter()
            .map(|name| {
                if name.ends_with(".exe") {
                    dir.join(name)
                } else {
                    dir.join(format!("{name}.exe"))
                }
            })
            .collect()
    }

    /// Returns the working directory.
    pub fn work_directory(&self) -> &Path {
        &self.work_directory
    }

    /// Root of the staged file tree.
    pub fn staging_directory(&self) -> PathBuf {
        self.work_directory.join("out")
    }

    /// Path of the generated WiX include fragment.
    pub fn fragment_path(&self) -> PathBuf {
        self.work_directory.join("libraries.wxi")
    }

    /// Directory caching the signing tool.
    pub fn sign_directory(&self) -> PathBuf {
        self.work_directory.join("sign")
    }

    /// Path of the compiled WiX object.
    pub fn object_path(&self) -> PathBuf {
        self.work_directory
            .join(format!("{}.wixobj", self.product_name()))
    }

    /// Path of the final installer package.
    pub fn installer_path(&self) -> PathBuf {
        self.work_directory.join(format!("{}.msi", self.product_name()))
    }

    /// File name of the application icon inside the staging tree.
    pub fn icon_file_name(&self) -> String {
        format!("{}.ico", self.product_name())
    }

    /// Resolves a configured path against the project directory.
    pub fn project_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_directory.join(path)
        }
    }

    /// Returns the WiX toolset directory.
    pub fn wix_directory(&self) -> &Path {
        &self.wix_directory
    }

    /// Manufacturer for the installer.
    pub fn manufacturer(&self) -> &str {
        self.msi
            .manufacturer
            .as_deref()
            .or_else(|| self.package.authors.first().map(String::as_str))
            .unwrap_or_else(|| self.product_name())
    }

    /// Identifier seeding the UpgradeCode.
    pub fn identifier(&self) -> &str {
        self.msi
            .identifier
            .as_deref()
            .unwrap_or_else(|| self.product_name())
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        package: PackageSettings,
        msi: MsiSettings,
        project_directory: PathBuf,
        target_directory: PathBuf,
        work_directory: PathBuf,
        target: Option<String>,
        release: bool,
        sign: bool,
        cargo: Vec<String>,
        manifest_path: Option<PathBuf>,
        wix_directory: PathBuf,
    ) -> Self {
        Self {
            package,
            msi,
            project_directory,
            target_directory,
            work_directory,
            target,
            release,
            sign,
            cargo,
            manifest_path,
            wix_directory,
        }
    }
}
