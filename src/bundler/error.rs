//! Error types for bundling operations.
//!
//! Provides the [`Error`] enum used throughout the bundler, plus the
//! [`ErrorExt`] and [`Context`] helper traits and the [`bail!`](crate::bail) macro.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    process::ExitStatus,
};
use thiserror::Error as ThisError;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building an installer.
#[derive(ThisError, Debug)]
pub enum Error {
    /// An input file the pipeline expects was not found.
    #[error("'{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    /// A required external tool is not installed or not on PATH.
    #[error("{tool} not found: {hint}")]
    ToolNotFound {
        /// Tool name
        tool: String,
        /// How to get it
        hint: String,
    },

    /// An external tool ran but exited unsuccessfully.
    #[error("{tool} failed with {status}")]
    ToolFailed {
        /// Tool name
        tool: String,
        /// Exit status reported by the OS
        status: ExitStatus,
    },

    /// An external tool could not be spawned.
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Command that failed to start
        command: String,
        /// Underlying spawn error
        error: std::io::Error,
    },

    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying io error
        error: std::io::Error,
    },

    /// Required environment variables are unset or empty.
    #[error("missing required environment variables: {}", vars.join(", "))]
    MissingEnv {
        /// Names of the missing variables
        vars: Vec<String>,
    },

    /// No dependency walker output identified the runtime distribution.
    #[error("could not determine the {marker} runtime root from dependency walker output")]
    NoRuntimeRoot {
        /// Marker directory searched for
        marker: String,
    },

    /// IO errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// JSON errors
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Zip archive errors
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// Image decoding/encoding errors
    #[error("{0}")]
    Image(#[from] image::ImageError),

    /// HTTP errors
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Directory traversal errors
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix errors
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Free-form error
    #[error("{0}")]
    GenericError(String),

    /// An error wrapped with additional context
    #[error("{context}: {source}")]
    Context {
        /// Context message
        context: String,
        /// Underlying error
        source: Box<Error>,
    },
}

/// Attach a path to io errors.
pub trait ErrorExt<T> {
    /// Convert an io error into [`Error::Fs`] naming the path involved.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Attach a message to a fallible value.
pub trait Context<T> {
    /// Wrap the error (or `None`) with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Lazily wrap the error (or `None`) with the context returned by `f`.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: Into<Error>> Context<T> for std::result::Result<T, E> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context {
            context: context.to_string(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context {
            context: f().to_string(),
            source: Box::new(e.into()),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_names_path() {
        let err: Result<()> = Err(std::io::Error::from(std::io::ErrorKind::NotFound))
            .fs_context("copying", "/tmp/x.dll");
        let msg = err.unwrap_err().to_string();
        assert!(msg.starts_with("copying /tmp/x.dll"), "{msg}");
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let none: Option<u8> = None;
        let err = none.context("nothing here").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "nothing here"));
    }

    #[test]
    fn missing_env_lists_all_vars() {
        let err = Error::MissingEnv {
            vars: vec!["A".into(), "B".into()],
        };
        assert_eq!(err.to_string(), "missing required environment variables: A, B");
    }
}
