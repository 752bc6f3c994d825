//! MSI bundling for MinGW-linked Windows applications.
//!
//! The [`Bundler`] drives a fixed, linear pipeline:
//!
//! 1. Build the application with cargo
//! 2. Resolve runtime DLLs with `ntldd`
//! 3. Assemble the staging tree
//! 4. Rasterize installer artwork
//! 5. Generate the WiX `libraries.wxi` fragment
//! 6. Compile and link the `.msi` with WiX
//! 7. Optionally sign the package with CodeSignTool
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_msi::bundler::{Bundler, PackageSettings, SettingsBuilder};
//!
//! # async fn example() -> kodegen_bundler_msi::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .project_directory(".")
//!     .target_directory("target")
//!     .package_settings(PackageSettings {
//!         product_name: "my-app".into(),
//!         version: "1.0.0".into(),
//!         ..Default::default()
//!     })
//!     .build()?;
//!
//! let artifact = Bundler::new(settings).bundle().await?;
//! println!("{} ({})", artifact.path.display(), artifact.checksum);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::Bundler;
pub use error::{Error, Result};
pub use platform::BundledArtifact;
pub use settings::{
    Arch, DEFAULT_WIX_DIRECTORY, MsiSettings, Overlay, PackageSettings, Settings, SettingsBuilder,
    SignSettings,
};
