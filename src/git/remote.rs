//! Repository identity from a remote URL.
//!
//! Two remote shapes are recognised:
//!
//! - SSH: `git@github.com:owner/repo.git`
//! - HTTPS: `https://github.com/owner/repo.git`
//!
//! The `.git` suffix is optional in both. SSH paths are taken as they are,
//! so `git@host:repo.git` yields `repo`.

use std::fmt;

use super::{
    DEFAULT_REMOTE,
    GitAccess,
};
use crate::error::{
    Error,
    Result,
};

const SSH_PREFIX: &str = "git@";
const HTTPS_PREFIX: &str = "https://";

/// Repository path on the host, usually `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    path: String,
}

impl RepoId {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            path: format!("{}/{}", owner, repo),
        }
    }

    /// A path exactly as it appears in the remote URL.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Extract the repository path from a git remote URL.
///
/// # Errors
///
/// - [`Error::InvalidFormat`] if the URL has a known prefix but the path is
///   empty (SSH) or is missing the owner or the repository (HTTPS).
/// - [`Error::UnsupportedFormat`] if the URL is neither SSH nor HTTPS.
pub fn parse_repo_from_url(remote_url: &str) -> Result<RepoId> {
    if remote_url.starts_with(SSH_PREFIX) {
        let parts: Vec<&str> = remote_url.split(':').collect();
        if parts.len() < 2 {
            return Err(Error::InvalidFormat(remote_url.to_string()));
        }
        let path = parts[parts.len() - 1];
        let path = path.strip_suffix(".git").unwrap_or(path);
        if path.is_empty() {
            return Err(Error::InvalidFormat(remote_url.to_string()));
        }
        return Ok(RepoId::from_path(path));
    }

    if remote_url.starts_with(HTTPS_PREFIX) {
        // ["https:", "", host, owner, repo]
        let parts: Vec<&str> = remote_url.split('/').collect();
        if parts.len() < 5 {
            return Err(Error::InvalidFormat(remote_url.to_string()));
        }
        let owner = parts[parts.len() - 2];
        let repo = parts[parts.len() - 1];
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if owner.is_empty() || repo.is_empty() {
            return Err(Error::InvalidFormat(remote_url.to_string()));
        }
        return Ok(RepoId::new(owner, repo));
    }

    Err(Error::UnsupportedFormat(remote_url.to_string()))
}

/// Resolve the repository identity from the `origin` remote.
pub async fn current_repo<G: GitAccess>(git: &G) -> Result<RepoId> {
    let url = git.remote_url(DEFAULT_REMOTE).await?;
    parse_repo_from_url(url.trim())
}
