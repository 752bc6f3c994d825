//! Package metadata.

/// Package metadata from the application's `[package]` section.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     product_name: "my-app".into(),
///     version: "1.0.0".into(),
///     description: "An awesome application".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageSettings {
    /// Product name; names the `.msi`, the `.ico` and the install folder.
    pub product_name: String,

    /// Version string, passed to WiX as `crate_version`.
    pub version: String,

    /// Brief description of the application.
    pub description: String,

    /// Homepage URL for the application.
    pub homepage: Option<String>,

    /// Package authors, "Name <email@example.com>".
    pub authors: Vec<String>,

    /// Names of the package's `bin` targets.
    pub binaries: Vec<String>,
}
