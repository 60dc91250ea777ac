//! GitHub App authentication.
//!
//! This module provides:
//! - Repository identity resolution from owner/name or Git remote URLs
//! - JWT generation for GitHub App authentication
//! - The API calls that resolve an installation and mint its access token

pub mod api_client;
pub mod repository;
pub mod token_manager;

pub use api_client::{GitHubApi, GitHubClient, InstallationId};
pub use repository::{IdentityInput, RepositoryRef};
pub use token_manager::{generate_app_jwt, AppIdentity, InstallationToken, SigningKey};
