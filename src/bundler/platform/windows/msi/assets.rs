//! Installer artwork.
//!
//! SVG sources are rasterized with `rsvg-convert` at the sizes WiX expects,
//! then re-encoded with the `image` crate: the icon as ICO, the WixUI banner
//! and dialog as 24-bit BMP.

use crate::bundler::{
    builder::tool_detection,
    error::{Error, Result},
    utils::command,
};
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Application icon size.
pub const ICON_SIZE: (u32, u32) = (256, 256);
/// WixUI top banner size.
pub const BANNER_SIZE: (u32, u32) = (493, 58);
/// WixUI welcome/exit dialog background size.
pub const DIALOG_SIZE: (u32, u32) = (493, 312);

/// Container format of a rendered asset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssetFormat {
    /// Windows icon, alpha preserved.
    Ico,
    /// Windows bitmap, alpha dropped.
    Bmp,
}

/// One SVG to render.
#[derive(Clone, Debug)]
pub struct AssetJob {
    /// SVG source.
    pub source: PathBuf,
    /// Pixel size.
    pub size: (u32, u32),
    /// Intermediate PNG path.
    pub png: PathBuf,
    /// Final output path.
    pub output: PathBuf,
    /// Final container format.
    pub format: AssetFormat,
}

/// Rasterizes and encodes one asset.
pub async fn render(job: &AssetJob) -> Result<()> {
    if !job.source.exists() {
        return Err(Error::MissingFile(job.source.clone()));
    }

    rasterize(&job.source, job.size, &job.png).await?;

    let png = job.png.clone();
    let output = job.output.clone();
    let format = job.format;
    tokio::task::spawn_blocking(move || encode(&png, &output, format))
        .await
        .map_err(|e| Error::GenericError(format!("Image conversion task panicked: {}", e)))??;

    log::info!("Rendered {}", job.output.display());
    Ok(())
}

/// Renders `svg` to a PNG of exactly `size` pixels.
async fn rasterize(svg: &Path, (width, height): (u32, u32), png: &Path) -> Result<()> {
    let rsvg = tool_detection::require("rsvg-convert")?;
    let mut cmd = Command::new(rsvg);
    cmd.arg("--width")
        .arg(width.to_string())
        .arg("--height")
        .arg(height.to_string())
        .arg("-o")
        .arg(png)
        .arg(svg);
    command::run(&mut cmd, "rsvg-convert").await
}

/// Re-encodes a raster image into `format`.
pub fn encode(input: &Path, output: &Path, format: AssetFormat) -> Result<()> {
    let img = image::open(input)?;
    match format {
        AssetFormat::Ico => img.save_with_format(output, ImageFormat::Ico)?,
        AssetFormat::Bmp => {
            DynamicImage::ImageRgb8(img.to_rgb8()).save_with_format(output, ImageFormat::Bmp)?
        }
    }
    Ok(())
}
