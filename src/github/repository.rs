//! Repository identity resolution.
//!
//! A target repository can be supplied as an explicit owner/name pair, as a
//! combined `owner/name` string, or as a Git remote URL in SSH
//! (`git@host:owner/name.git`) or HTTP(S) (`https://host/owner/name.git`)
//! form. All of them normalize to a [`RepositoryRef`].

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::TokenError;

lazy_static! {
    /// SSH remote: git@<host>:<owner>/<name>.git
    static ref GIT_SSH_REMOTE_REGEX: Regex = Regex::new(
        r"^git@(?P<host>[^:/\s]+):(?P<owner>[^/\s]+)/(?P<name>[^/\s]+)\.git$"
    ).unwrap();

    /// HTTP(S) remote: http(s)://<host>/<owner>/<name>.git
    static ref GIT_HTTP_REMOTE_REGEX: Regex = Regex::new(
        r"^https?://(?P<host>[^/@\s]+)/(?P<owner>[^/\s]+)/(?P<name>[^/\s]+)\.git$"
    ).unwrap();

    /// Credentials embedded before the host of a URL.
    static ref URL_USERINFO_REGEX: Regex = Regex::new(
        r"^(?P<scheme>[a-zA-Z][a-zA-Z0-9+.-]*://)[^/@\s]+@"
    ).unwrap();
}

/// How the target repository was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityInput {
    /// Pre-split owner and repository name.
    Explicit { owner: String, name: String },
    /// A Git remote URL, SSH or HTTP(S), ending in `.git`.
    Url(String),
}

impl IdentityInput {
    pub fn resolve(&self) -> Result<RepositoryRef, TokenError> {
        match self {
            IdentityInput::Explicit { owner, name } => RepositoryRef::new(owner, name),
            IdentityInput::Url(url) => RepositoryRef::from_git_url(url),
        }
    }
}

/// Normalized repository identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    /// Host captured from a remote URL, if the repository came from one.
    pub host_hint: Option<String>,
}

impl RepositoryRef {
    /// Build from an explicit owner/name pair.
    pub fn new(owner: &str, name: &str) -> Result<Self, TokenError> {
        if !is_path_segment(owner) || !is_path_segment(name) {
            return Err(TokenError::MalformedRepositoryReference {
                input: format!("{}/{}", owner, name),
            });
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            host_hint: None,
        })
    }

    /// Parse a combined `owner/name` string.
    pub fn from_full_name(full_name: &str) -> Result<Self, TokenError> {
        match full_name.split_once('/') {
            Some((owner, name)) if is_path_segment(owner) && is_path_segment(name) => {
                Self::new(owner, name)
            }
            _ => Err(TokenError::MalformedRepositoryReference {
                input: full_name.to_string(),
            }),
        }
    }

    /// Parse a Git remote URL. Owner and name are taken verbatim from the URL.
    pub fn from_git_url(url: &str) -> Result<Self, TokenError> {
        let captures = GIT_SSH_REMOTE_REGEX
            .captures(url)
            .or_else(|| GIT_HTTP_REMOTE_REGEX.captures(url))
            .ok_or_else(|| TokenError::MalformedRepositoryReference {
                input: redact_userinfo(url),
            })?;

        Ok(Self {
            owner: captures["owner"].to_string(),
            name: captures["name"].to_string(),
            host_hint: Some(captures["host"].to_string()),
        })
    }

    /// `owner/name`, as used in API paths.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Replace `user:secret@` in a URL so it can be logged.
fn redact_userinfo(url: &str) -> String {
    URL_USERINFO_REGEX
        .replace(url, "${scheme}***@")
        .into_owned()
}

fn is_path_segment(s: &str) -> bool {
    !s.is_empty() && !s.contains('/') && !s.chars().any(char::is_whitespace)
}
