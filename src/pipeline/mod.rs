//! The token issuance pipeline.
//!
//! Resolve repository → sign app JWT → look up installation → exchange for
//! an access token → publish. Each stage returns a `Result` and the first
//! error ends the run, so no request is sent after a failure.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::error::TokenError;
use crate::github::{generate_app_jwt, GitHubApi, InstallationId};
use crate::publish::TokenPublisher;

/// Run one issuance and return the installation the token was minted for.
pub async fn issue_token<A, P>(
    config: &Config,
    api: &A,
    publisher: &P,
    now: DateTime<Utc>,
) -> Result<InstallationId, TokenError>
where
    A: GitHubApi + ?Sized,
    P: TokenPublisher + ?Sized,
{
    let repo = config.repository.resolve()?;
    info!(
        repository = %repo.full_name(),
        host = repo.host_hint.as_deref().unwrap_or("-"),
        "Resolved target repository"
    );

    let jwt = generate_app_jwt(&config.app, &config.signing_key, now)?;

    let installation_id = api.get_repo_installation(&jwt, &repo).await?;
    info!(installation_id = %installation_id, "Found app installation");

    let token = api.create_installation_token(&jwt, installation_id).await?;
    info!(
        expires_at = token.expires_at.as_deref().unwrap_or("unknown"),
        "Installation access token issued"
    );

    publisher.publish(&token).await?;

    Ok(installation_id)
}
