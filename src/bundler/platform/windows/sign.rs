//! Remote code signing with SSL.com CodeSignTool.
//!
//! The tool is downloaded and unpacked into `<work_dir>/sign` once and reused
//! by later runs. Download and extraction commit by atomic rename, so an
//! interrupted run never leaves a half-written tool behind.

use crate::bundler::{
    error::{Context, Error, Result},
    settings::Settings,
    utils::{archive, command, fs, http},
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Environment variables holding the signing credentials.
pub const CREDENTIAL_VARS: [&str; 4] = [
    "SSL_COM_CREDENTIAL_ID",
    "SSL_COM_USERNAME",
    "SSL_COM_PASSWORD",
    "SSL_COM_TOTP_SECRET",
];

const TOOL_ARCHIVE: &str = "CodeSignTool.zip";
const TOOL_DIR: &str = "CodeSignTool";
const TOOL_SCRIPT: &str = "CodeSignTool.bat";

/// SSL.com eSigner credentials.
#[derive(Clone)]
pub struct Credentials {
    pub credential_id: String,
    pub username: String,
    pub password: String,
    pub totp_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("credential_id", &self.credential_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Reads credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through `lookup`.
    ///
    /// Every unset or empty variable is reported in a single
    /// [`Error::MissingEnv`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut values = Vec::with_capacity(CREDENTIAL_VARS.len());
        let mut missing = Vec::new();
        for name in CREDENTIAL_VARS {
            match lookup(name).filter(|v| !v.is_empty()) {
                Some(value) => values.push(value),
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(Error::MissingEnv { vars: missing });
        }

        let [credential_id, username, password, totp_secret]: [String; 4] = values
            .try_into()
            .map_err(|_| Error::GenericError("credential count mismatch".into()))?;
        Ok(Self {
            credential_id,
            username,
            password,
            totp_secret,
        })
    }
}

/// Signs [`Settings::installer_path`] in place.
pub async fn sign_installer(settings: &Settings) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let msi = settings.installer_path();
    if !msi.exists() {
        return Err(Error::MissingFile(msi));
    }

    let sign_dir = settings.sign_directory();
    fs::create_dir_all(&sign_dir, false).await?;

    let tool_dir = ensure_tool(&sign_dir, &settings.msi_settings().sign.tool_url).await?;

    let program_name = settings
        .msi_settings()
        .sign
        .program_name
        .as_deref()
        .unwrap_or_else(|| settings.product_name());

    log::info!("Signing {}", msi.display());
    let mut cmd = Command::new("cmd");
    cmd.current_dir(&tool_dir)
        .arg("/c")
        .arg(TOOL_SCRIPT)
        .arg("sign")
        .arg(format!("-credential_id={}", credentials.credential_id))
        .arg(format!("-username={}", credentials.username))
        .arg(format!("-password={}", credentials.password))
        .arg(format!("-totp_secret={}", credentials.totp_secret))
        .arg(format!("-program_name={}", program_name))
        .arg(format!("-input_file_path={}", msi.display()))
        .arg(format!("-output_dir_path={}", sign_dir.display()));
    command::run(&mut cmd, "CodeSignTool").await?;

    replace_with_signed(&msi, &sign_dir).await
}

/// Downloads and unpacks CodeSignTool unless already present.
///
/// Returns the directory holding `CodeSignTool.bat`.
pub async fn ensure_tool(sign_dir: &Path, url: &str) -> Result<PathBuf> {
    let archive_path = sign_dir.join(TOOL_ARCHIVE);
    if archive_path.exists() {
        log::debug!("Using cached {}", archive_path.display());
    } else {
        http::download(url, &archive_path).await?;
    }

    let tool_dir = sign_dir.join(TOOL_DIR);
    if tool_dir.exists() {
        log::debug!("Using cached {}", tool_dir.display());
    } else {
        archive::extract_zip(&archive_path, &tool_dir).await?;
    }

    Ok(tool_dir)
}

/// Moves the signed copy written to `sign_dir` over the original package.
pub async fn replace_with_signed(msi: &Path, sign_dir: &Path) -> Result<()> {
    let name = msi
        .file_name()
        .with_context(|| format!("{} has no file name", msi.display()))?;
    let signed = sign_dir.join(name);
    if !signed.exists() {
        return Err(Error::MissingFile(signed));
    }

    fs::remove_file(msi).await?;
    fs::rename(&signed, msi).await?;
    log::info!("Signed {}", msi.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_all_credentials() {
        let creds = Credentials::from_lookup(lookup(&[
            ("SSL_COM_CREDENTIAL_ID", "id"),
            ("SSL_COM_USERNAME", "user"),
            ("SSL_COM_PASSWORD", "pass"),
            ("SSL_COM_TOTP_SECRET", "totp"),
        ]))
        .unwrap();
        assert_eq!(creds.credential_id, "id");
        assert_eq!(creds.totp_secret, "totp");
        assert!(!format!("{creds:?}").contains("pass"));
    }

    #[test]
    fn reports_every_missing_or_empty_variable() {
        let err = Credentials::from_lookup(lookup(&[
            ("SSL_COM_CREDENTIAL_ID", "id"),
            ("SSL_COM_PASSWORD", ""),
        ]))
        .unwrap_err();

        match err {
            Error::MissingEnv { vars } => assert_eq!(
                vars,
                ["SSL_COM_USERNAME", "SSL_COM_PASSWORD", "SSL_COM_TOTP_SECRET"]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn signed_copy_replaces_original() {
        let dir = tempfile::tempdir().unwrap();
        let sign_dir = dir.path().join("sign");
        std::fs::create_dir(&sign_dir).unwrap();
        let msi = dir.path().join("app.msi");
        std::fs::write(&msi, b"unsigned").unwrap();
        std::fs::write(sign_dir.join("app.msi"), b"signed").unwrap();

        replace_with_signed(&msi, &sign_dir).await.unwrap();

        assert_eq!(std::fs::read(&msi).unwrap(), b"signed");
        assert!(!sign_dir.join("app.msi").exists());
    }

    #[tokio::test]
    async fn cached_tool_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOOL_ARCHIVE), b"zip").unwrap();
        std::fs::create_dir(dir.path().join(TOOL_DIR)).unwrap();

        let tool = ensure_tool(dir.path(), "http://127.0.0.1:9/unreachable")
            .await
            .unwrap();
        assert_eq!(tool, dir.path().join(TOOL_DIR));
    }
}
