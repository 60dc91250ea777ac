//! Token publishing.
//!
//! The issued token is handed to exactly one sink:
//! - `Stdout` writes it to the GitHub Actions output file when one is
//!   configured, otherwise prints an `access_token::<value>` line
//! - `EnvironmentStore` registers it with an envman-compatible command
//!   (`<program> add --key <variable> --value <token>`)

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::TokenError;
use crate::github::InstallationToken;

pub const DEFAULT_OUTPUT_NAME: &str = "access_token";
pub const DEFAULT_ENV_STORE_PROGRAM: &str = "envman";
pub const DEFAULT_ENV_STORE_VARIABLE: &str = "GITHUB_APP_TOKEN";

const CONFIRMATION: &str = "Access token generated successfully.";

/// Which sink a deployment publishes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SinkKind {
    Stdout,
    EnvStore,
}

/// Delivers an issued token to the calling environment.
#[async_trait]
pub trait TokenPublisher: Send + Sync {
    async fn publish(&self, token: &InstallationToken) -> Result<(), TokenError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSink {
    Stdout {
        /// GitHub Actions output file (`$GITHUB_OUTPUT`).
        output_file: Option<PathBuf>,
        output_name: String,
    },
    EnvironmentStore {
        program: String,
        variable: String,
    },
}

#[async_trait]
impl TokenPublisher for TokenSink {
    async fn publish(&self, token: &InstallationToken) -> Result<(), TokenError> {
        match self {
            TokenSink::Stdout {
                output_file: Some(path),
                output_name,
            } => {
                let mut stdout = std::io::stdout();
                write_github_output(path, &mut stdout, output_name, token)?;
                info!(output = %output_name, file = %path.display(), "Access token written to step output");
                Ok(())
            }
            TokenSink::Stdout {
                output_file: None,
                output_name,
            } => {
                let mut stdout = std::io::stdout();
                write_stdout_output(&mut stdout, output_name, token)?;
                info!(output = %output_name, "Access token written to stdout");
                Ok(())
            }
            TokenSink::EnvironmentStore { program, variable } => {
                register_env_var(program, variable, token).await?;
                info!(variable = %variable, "Access token registered in environment store");
                Ok(())
            }
        }
    }
}

/// Print `<name>::<value>` followed by a confirmation line.
pub fn write_stdout_output<W: Write>(
    out: &mut W,
    output_name: &str,
    token: &InstallationToken,
) -> Result<(), TokenError> {
    writeln!(out, "{}::{}", output_name, token.value)
        .and_then(|_| writeln!(out, "{}", CONFIRMATION))
        .and_then(|_| out.flush())
        .map_err(|e| TokenError::publish(format!("failed to write to stdout: {}", e)))
}

/// Append `<name>=<value>` to the Actions output file, masking the value in logs.
pub fn write_github_output<W: Write>(
    path: &Path,
    out: &mut W,
    output_name: &str,
    token: &InstallationToken,
) -> Result<(), TokenError> {
    // Register the mask before the value can appear anywhere else.
    writeln!(out, "::add-mask::{}", token.value)
        .map_err(|e| TokenError::publish(format!("failed to write to stdout: {}", e)))?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            TokenError::publish(format!(
                "failed to open output file {}: {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}={}", output_name, token.value).map_err(|e| {
        TokenError::publish(format!(
            "failed to write output file {}: {}",
            path.display(),
            e
        ))
    })?;

    writeln!(out, "{}", CONFIRMATION)
        .and_then(|_| out.flush())
        .map_err(|e| TokenError::publish(format!("failed to write to stdout: {}", e)))
}

/// Run `<program> add --key <variable> --value <token>`.
pub async fn register_env_var(
    program: &str,
    variable: &str,
    token: &InstallationToken,
) -> Result<(), TokenError> {
    debug!(program = %program, variable = %variable, "Registering environment variable");

    let output = Command::new(program)
        .args(["add", "--key", variable, "--value", &token.value])
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| TokenError::publish(format!("failed to execute {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).replace(&token.value, "***");
        return Err(TokenError::publish(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
