//! Windows MSI bundler for MinGW-linked Rust applications
//!
//! This library builds an application with cargo, collects the MinGW runtime
//! DLLs and data files it loads, generates the WiX sources, and links an
//! `.msi`, optionally signing it with SSL.com CodeSignTool.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
