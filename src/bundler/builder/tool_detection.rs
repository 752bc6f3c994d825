//! External tool detection.
//!
//! Every tool the pipeline shells out to is looked up on PATH before use so a
//! missing tool fails with an install hint instead of a bare spawn error.

use crate::bundler::error::{Error, Result};
use std::path::PathBuf;

/// Install hint for a tool.
fn hint(tool: &str) -> &'static str {
    match tool {
        "ntldd" => "install it with `pacman -S mingw-w64-<arch>-ntldd-git`",
        "strip" => "install binutils with `pacman -S mingw-w64-<arch>-binutils`",
        "glib-compile-schemas" => "install glib with `pacman -S mingw-w64-<arch>-glib2`",
        "rsvg-convert" => "install librsvg with `pacman -S mingw-w64-<arch>-librsvg`",
        _ => "make sure it is installed and on PATH",
    }
}

/// Locates `tool` on PATH.
pub fn require(tool: &str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            Err(Error::ToolNotFound {
                tool: tool.to_string(),
                hint: hint(tool).to_string(),
            })
        }
    }
}

/// Checks that every tool in `tools` is available, reporting the first
/// missing one.
pub fn require_all(tools: &[&str]) -> Result<()> {
    for tool in tools {
        require(tool)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_carries_hint() {
        let err = require("definitely-not-a-real-tool-kodegen").unwrap_err();
        match err {
            Error::ToolNotFound { tool, hint } => {
                assert_eq!(tool, "definitely-not-a-real-tool-kodegen");
                assert!(hint.contains("PATH"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
