//! WiX toolset location.
//!
//! WiX v3 installs `candle.exe` and `light.exe` under `<wix_dir>/bin`.

use crate::bundler::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Locates a WiX executable such as `candle` or `light`.
///
/// Looks in `<wix_dir>/bin` first, then falls back to `PATH`.
pub fn wix_tool(wix_dir: &Path, name: &str) -> Result<PathBuf> {
    let exe = wix_dir.join("bin").join(format!("{name}.exe"));
    if exe.is_file() {
        return Ok(exe);
    }

    match which::which(name) {
        Ok(path) => {
            log::debug!("{} not in {}, using {}", name, wix_dir.display(), path.display());
            Ok(path)
        }
        Err(_) => Err(Error::ToolNotFound {
            tool: format!("{name}.exe"),
            hint: format!(
                "install WiX Toolset v3 or point --wix (or WIX) at it; looked in {}",
                wix_dir.join("bin").display()
            ),
        }),
    }
}
