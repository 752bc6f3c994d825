//! Configuration structures for MSI bundling.
//!
//! [`Settings`] is assembled by [`SettingsBuilder`] from command line flags,
//! cargo metadata, and the `[package.metadata.bundle.msi]` table.

mod arch;
mod builder;
mod core;
mod package;
mod windows;

pub use arch::Arch;
pub use builder::{DEFAULT_WIX_DIRECTORY, SettingsBuilder};
pub use core::Settings;
pub use package::PackageSettings;
pub use windows::{CODESIGNTOOL_URL, MsiSettings, Overlay, SignSettings};
