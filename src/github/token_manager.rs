//! Token management for GitHub App authentication.
//!
//! GitHub Apps use two types of authentication:
//! 1. App JWT - Short-lived JWT signed with the app's private key (for app-level operations)
//! 2. Installation Access Token - Token for a specific installation (for repo operations)

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Lifetime of an app JWT in seconds (GitHub's maximum).
pub const APP_JWT_TTL_SECS: i64 = 600;

/// The GitHub App the JWT is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub app_id: String,
}

impl AppIdentity {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
        }
    }
}

/// PEM-encoded RSA private key of the app.
#[derive(Clone)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn from_pem(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// JWT claims for GitHub App authentication.
/// GitHub requires: iat (issued at), exp (expiration), iss (issuer = app_id)
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubAppClaims {
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp), always `iat + 600`
    pub exp: i64,
    /// Issuer - the GitHub App ID
    pub iss: String,
}

impl GitHubAppClaims {
    pub fn new(identity: &AppIdentity, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iat,
            exp: iat + APP_JWT_TTL_SECS,
            iss: identity.app_id.clone(),
        }
    }
}

/// Generate a JWT for GitHub App authentication.
///
/// The JWT is signed with RS256 (RSA-SHA256) using the app's private key and
/// is valid for 10 minutes from `now`. Passing `now` explicitly keeps the
/// result deterministic for a given key.
///
/// # Example
/// ```ignore
/// let jwt = generate_app_jwt(&AppIdentity::new("12345"), &key, Utc::now())?;
/// // Use: Authorization: Bearer {jwt}
/// ```
pub fn generate_app_jwt(
    identity: &AppIdentity,
    key: &SigningKey,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let claims = GitHubAppClaims::new(identity, now);
    let header = Header::new(Algorithm::RS256);

    let encoding_key = EncodingKey::from_rsa_pem(key.as_bytes())
        .map_err(|e| TokenError::SigningFailure(format!("invalid private key PEM: {}", e)))?;

    encode(&header, &claims, &encoding_key)
        .map_err(|e| TokenError::SigningFailure(format!("failed to encode JWT: {}", e)))
}

/// Installation access token returned by the exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct InstallationToken {
    pub value: String,
    /// Expiry as reported by GitHub; informational only.
    pub expires_at: Option<String>,
}

impl InstallationToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }
}

impl fmt::Debug for InstallationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
