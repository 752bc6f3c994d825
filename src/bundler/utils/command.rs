//! External tool invocation.
//!
//! Tools inherit stderr so their own diagnostics reach the user unmodified.
//! A nonzero exit is always an error.

use crate::bundler::error::{Error, Result};
use tokio::process::Command;

/// Runs `command` to completion with inherited stdio.
pub async fn run(command: &mut Command, tool: &str) -> Result<()> {
    log::debug!("Running {:?}", command.as_std());

    let status = command.status().await.map_err(|error| Error::CommandFailed {
        command: tool.to_string(),
        error,
    })?;

    if !status.success() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            status,
        });
    }

    Ok(())
}

/// Runs `command` and returns its stdout as text.
pub async fn output(command: &mut Command, tool: &str) -> Result<String> {
    log::debug!("Running {:?}", command.as_std());

    let output = command
        .stderr(std::process::Stdio::inherit())
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: tool.to_string(),
            error,
        })?;

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            status: output.status,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
