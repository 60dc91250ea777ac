//! GitHub API client for the two app-authenticated calls of a token run.
//!
//! Both calls authenticate with the app JWT as a bearer credential:
//! - `GET /repos/{owner}/{repo}/installation` resolves the installation id
//! - `POST /app/installations/{id}/access_tokens` mints the access token

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::TokenError;
use crate::github::repository::RepositoryRef;
use crate::github::token_manager::InstallationToken;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("app-token/", env!("CARGO_PKG_VERSION"));

/// Identifier of an app installation on an account or repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallationId(pub u64);

impl fmt::Display for InstallationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The app-level GitHub operations a token run needs.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Look up the installation of the app on a repository.
    async fn get_repo_installation(
        &self,
        jwt: &str,
        repo: &RepositoryRef,
    ) -> Result<InstallationId, TokenError>;

    /// Create an access token scoped to an installation.
    async fn create_installation_token(
        &self,
        jwt: &str,
        installation_id: InstallationId,
    ) -> Result<InstallationToken, TokenError>;
}

/// GitHub API client backed by reqwest.
pub struct GitHubClient {
    api_url: String,
    client: reqwest::Client,
}

impl GitHubClient {
    /// Create a client for the given API base URL (e.g. `https://api.github.com`).
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, TokenError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TokenError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn request(&self, method: reqwest::Method, url: &str, jwt: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", jwt))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Send a request and return the status and body text.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), TokenError> {
        let response = request
            .send()
            .await
            .map_err(|e| TokenError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TokenError::Transport(format!("failed to read response body: {}", e)))?;

        Ok((status, body))
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_repo_installation(
        &self,
        jwt: &str,
        repo: &RepositoryRef,
    ) -> Result<InstallationId, TokenError> {
        let url = format!(
            "{}/repos/{}/{}/installation",
            self.api_url, repo.owner, repo.name
        );
        debug!(url = %url, "Looking up app installation");

        let (status, body) = self
            .send(self.request(reqwest::Method::GET, &url, jwt))
            .await?;

        if !is_success(status) {
            return Err(TokenError::InstallationLookupFailure { status });
        }

        parse_installation_id(&body)
    }

    async fn create_installation_token(
        &self,
        jwt: &str,
        installation_id: InstallationId,
    ) -> Result<InstallationToken, TokenError> {
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_url, installation_id
        );
        debug!(url = %url, "Requesting installation access token");

        let (status, body) = self
            .send(self.request(reqwest::Method::POST, &url, jwt))
            .await?;

        if !is_success(status) {
            return Err(TokenError::TokenExchangeFailure { status });
        }

        parse_access_token(&body)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

// Response types

#[derive(Debug, Deserialize)]
struct InstallationResponse {
    id: Option<u64>,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    token: Option<String>,
    expires_at: Option<String>,
}

/// Extract the installation id from a `GET /repos/{owner}/{repo}/installation` body.
pub fn parse_installation_id(body: &str) -> Result<InstallationId, TokenError> {
    let response: InstallationResponse = serde_json::from_str(body).map_err(|e| {
        TokenError::Transport(format!("failed to parse installation response: {}", e))
    })?;

    response
        .id
        .map(InstallationId)
        .ok_or(TokenError::InstallationNotFound)
}

/// Extract the token from a `POST /app/installations/{id}/access_tokens` body.
pub fn parse_access_token(body: &str) -> Result<InstallationToken, TokenError> {
    // The body holds the secret, so parse errors must not echo it.
    let response: AccessTokenResponse = serde_json::from_str(body).map_err(|e| {
        TokenError::Transport(format!(
            "failed to parse access token response at line {} column {}",
            e.line(),
            e.column()
        ))
    })?;

    match response.token {
        Some(value) if !value.is_empty() => Ok(InstallationToken {
            value,
            expires_at: response.expires_at,
        }),
        _ => Err(TokenError::TokenMissingInResponse),
    }
}
