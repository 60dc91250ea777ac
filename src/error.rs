//! Error taxonomy for a token issuance run.
//!
//! Every variant is terminal: the pipeline stops at the first error and the
//! process exits non-zero. Messages carry status codes or offending inputs,
//! never the signing key or the issued token.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Missing required configuration: {0}")]
    ConfigurationMissing(String),

    #[error("Malformed repository reference: {input}")]
    MalformedRepositoryReference { input: String },

    #[error("Failed to sign app JWT: {0}")]
    SigningFailure(String),

    #[error("GitHub API error looking up installation: {status}")]
    InstallationLookupFailure { status: u16 },

    #[error("Installation ID not found in response")]
    InstallationNotFound,

    #[error("GitHub API error creating installation token: {status}")]
    TokenExchangeFailure { status: u16 },

    #[error("Access token not found in response")]
    TokenMissingInResponse,

    #[error("Failed to publish access token: {reason}")]
    PublishFailure { reason: String },

    #[error("GitHub API request failed: {0}")]
    Transport(String),
}

impl TokenError {
    pub fn missing(what: impl Into<String>) -> Self {
        TokenError::ConfigurationMissing(what.into())
    }

    pub fn publish(reason: impl Into<String>) -> Self {
        TokenError::PublishFailure {
            reason: reason.into(),
        }
    }
}
