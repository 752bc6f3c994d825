//! Application build via cargo.

use crate::bundler::{
    error::{Context, Result},
    settings::Settings,
    utils::command,
};
use tokio::process::Command;

/// Arguments appended to the cargo command for `cargo build`.
pub fn build_args(settings: &Settings) -> Vec<String> {
    let mut args = vec!["build".to_string()];
    if settings.is_release() {
        args.push("--release".to_string());
    }
    if let Some(target) = settings.target() {
        args.push("--target".to_string());
        args.push(target.to_string());
    }
    if let Some(manifest) = settings.manifest_path() {
        args.push("--manifest-path".to_string());
        args.push(manifest.display().to_string());
    }
    args
}

/// Builds the application.
pub async fn build(settings: &Settings) -> Result<()> {
    let (program, extra) = settings
        .cargo_command()
        .split_first()
        .context("cargo command is empty")?;

    log::info!("Building {} with {}", settings.product_name(), program);

    let mut cmd = Command::new(program);
    cmd.args(extra).args(build_args(settings));
    command::run(&mut cmd, "cargo build").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{PackageSettings, SettingsBuilder};

    fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
            .package_settings(PackageSettings {
                product_name: "keyboard-configurator".into(),
                version: "1.3.0".into(),
                binaries: vec!["configurator".into()],
                ..Default::default()
            })
            .project_directory("/p")
            .target_directory("/p/target")
    }

    #[test]
    fn plain_debug_build() {
        let settings = builder().build().unwrap();
        assert_eq!(build_args(&settings), ["build"]);
    }

    #[test]
    fn release_target_and_manifest_are_forwarded() {
        let settings = builder()
            .release(true)
            .target("i686-pc-windows-gnu")
            .manifest_path("/p/Cargo.toml")
            .build()
            .unwrap();

        assert_eq!(
            build_args(&settings),
            [
                "build",
                "--release",
                "--target",
                "i686-pc-windows-gnu",
                "--manifest-path",
                "/p/Cargo.toml",
            ]
        );
    }
}
