//! Staging tree assembly.
//!
//! The staging tree is exactly what the installer ships:
//!
//! ```text
//! out/
//! ├── app.exe               stripped executables
//! ├── libgtk-3-0.dll        runtime DLLs, flattened
//! ├── lib/                  loaders and modules from the runtime
//! └── share/                schemas and icon themes from the runtime
//! ```

use super::dependencies::ResolvedDependencies;
use crate::bundler::{
    builder::tool_detection,
    error::{Context, Error, ErrorExt, Result},
    utils::{command, fs},
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Location of compiled GSettings schemas inside the staging tree.
pub const SCHEMA_DIR: &str = "share/glib-2.0/schemas";

/// Everything needed to populate a staging tree.
#[derive(Debug, Clone)]
pub struct StagePlan<'a> {
    /// Root of the staging tree; erased and recreated.
    pub out_dir: &'a Path,
    /// Executables to strip into the root.
    pub executables: &'a [PathBuf],
    /// Resolved DLLs, copied flat into the root.
    pub dependencies: &'a ResolvedDependencies,
    /// Project directories copied to a path relative to the root.
    pub overlays: Vec<(PathBuf, PathBuf)>,
    /// Paths relative to the runtime root copied to the same relative path.
    pub runtime_files: &'a [PathBuf],
}

/// Builds the staging tree described by `plan`.
///
/// Any existing tree is removed first, so nothing from an earlier run
/// survives.
pub async fn assemble(plan: &StagePlan<'_>) -> Result<()> {
    log::info!("Assembling staging tree at {}", plan.out_dir.display());
    fs::create_dir_all(plan.out_dir, true).await?;

    for exe in plan.executables {
        let name = exe
            .file_name()
            .with_context(|| format!("{} has no file name", exe.display()))?;
        strip(exe, &plan.out_dir.join(name)).await?;
    }

    for dep in plan.dependencies.entries() {
        fs::copy_path(&dep.source_path(), &plan.out_dir.join(&dep.file_name)).await?;
    }

    for (source, destination) in &plan.overlays {
        fs::copy_path(source, &plan.out_dir.join(destination)).await?;
    }

    if !plan.runtime_files.is_empty() {
        let root = plan
            .dependencies
            .runtime_root
            .as_deref()
            .context("runtime files configured but no runtime root was discovered")?;
        for rel in plan.runtime_files {
            fs::copy_path(&root.join(rel), &plan.out_dir.join(rel)).await?;
        }
    }

    compile_schemas(plan.out_dir).await
}

/// Writes a copy of `src` without debug information to `dest`.
pub async fn strip(src: &Path, dest: &Path) -> Result<()> {
    if !src.exists() {
        return Err(Error::MissingFile(src.to_path_buf()));
    }
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }

    log::info!("Strip {} -> {}", src.display(), dest.display());
    let strip = tool_detection::require("strip")?;
    command::run(Command::new(strip).arg("-o").arg(dest).arg(src), "strip").await
}

/// Regenerates `gschemas.compiled` when the tree ships schemas.
async fn compile_schemas(out_dir: &Path) -> Result<()> {
    let schemas = out_dir.join(SCHEMA_DIR);
    if !schemas.is_dir() {
        log::debug!("No schemas staged, skipping glib-compile-schemas");
        return Ok(());
    }

    log::info!("Compiling schemas in {}", schemas.display());
    let tool = tool_detection::require("glib-compile-schemas")?;
    command::run(Command::new(tool).arg(&schemas), "glib-compile-schemas").await
}
