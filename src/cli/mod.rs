//! Command-line interface.
//!
//! Every input can also come from the environment, which is how pipeline
//! steps usually pass them. The lowercase names (`app_id`, `private_key`,
//! `repository_name`) are accepted as a fallback for older step definitions.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Overrides;
use crate::publish::SinkKind;

/// Environment names accepted when the primary variable is unset.
const LEGACY_APP_ID_VAR: &str = "app_id";
const LEGACY_PRIVATE_KEY_VAR: &str = "private_key";
const LEGACY_REPOSITORY_VAR: &str = "repository_name";

/// CLI arguments structure
#[derive(Parser, Debug, Default)]
#[command(name = "app-token")]
#[command(author, version, about = "Mint a GitHub App installation access token", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "app-token.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// GitHub App ID
    #[arg(long, env = "APP_ID")]
    pub app_id: Option<String>,

    /// GitHub App private key (PEM)
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Path to the GitHub App private key (PEM)
    #[arg(long, env = "PRIVATE_KEY_PATH")]
    pub private_key_path: Option<PathBuf>,

    /// Target repository as owner/name
    #[arg(long, env = "REPOSITORY_NAME")]
    pub repository: Option<String>,

    /// Repository owner (used with --repo)
    #[arg(long, env = "REPOSITORY_OWNER")]
    pub owner: Option<String>,

    /// Repository name (used with --owner)
    #[arg(long, env = "REPOSITORY")]
    pub repo: Option<String>,

    /// Git remote URL (git@host:owner/name.git or https://host/owner/name.git)
    #[arg(long, env = "GIT_REPOSITORY_URL")]
    pub repository_url: Option<String>,

    /// Where to publish the token
    #[arg(long, env = "TOKEN_SINK", value_enum)]
    pub sink: Option<SinkKind>,

    /// Output name for the stdout sink
    #[arg(long)]
    pub output_name: Option<String>,

    /// GitHub Actions output file
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Variable name for the environment store sink
    #[arg(long)]
    pub variable: Option<String>,

    /// Registration command for the environment store sink
    #[arg(long)]
    pub envman_program: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,
}

impl Cli {
    /// Collect the inputs that override the config file.
    pub fn overrides(&self) -> Overrides {
        self.overrides_with(|name| std::env::var(name).ok())
    }

    fn overrides_with<F>(&self, legacy_env: F) -> Overrides
    where
        F: Fn(&str) -> Option<String>,
    {
        Overrides {
            app_id: self
                .app_id
                .clone()
                .or_else(|| legacy_env(LEGACY_APP_ID_VAR)),
            private_key: self
                .private_key
                .clone()
                .or_else(|| legacy_env(LEGACY_PRIVATE_KEY_VAR)),
            private_key_path: self.private_key_path.clone(),
            repository: self
                .repository
                .clone()
                .or_else(|| legacy_env(LEGACY_REPOSITORY_VAR)),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            repository_url: self.repository_url.clone(),
            sink: self.sink,
            output_name: self.output_name.clone(),
            github_output: self.github_output.clone(),
            variable: self.variable.clone(),
            program: self.envman_program.clone(),
            api_url: self.api_url.clone(),
        }
    }
}
