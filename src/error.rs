//! Error kinds shared by the library modules.
//!
//! Library functions return [`Result`]; the command layer wraps these with
//! `anyhow` context before they reach the user.

use std::time::Duration;

/// Errors raised while resolving a branch, a repository or pull request
/// links.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote URL matches neither the SSH nor the HTTPS shape.
    #[error("unsupported remote URL format: {0}")]
    UnsupportedFormat(String),

    /// The remote URL has a known prefix but no usable `owner/repo` path.
    #[error("invalid remote URL format: {0}")]
    InvalidFormat(String),

    /// HEAD is detached.
    #[error("could not determine current branch")]
    NoCurrentBranch,

    /// An explicitly requested branch exists neither locally nor on origin.
    #[error("branch '{0}' does not exist")]
    BranchNotFound(String),

    /// Checking whether a branch exists failed for a reason other than the
    /// branch being absent.
    #[error("failed to check branch existence")]
    ExistenceCheckFailed(#[source] Box<Error>),

    /// The branch listing was empty.
    #[error("no branches found")]
    NoBranches,

    /// The interactive picker was dismissed or failed.
    #[error("branch selection cancelled{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    SelectionCancelled(Option<String>),

    /// The pull request query (`gh api` or the `jq` filter) failed.
    #[error("{program} failed ({status}): {message}")]
    QueryFailed {
        program: String,
        status: String,
        message: String,
    },

    /// Writing to the system clipboard failed.
    #[error("clipboard copy error: {0}")]
    ClipboardWriteFailed(String),

    /// A git invocation exited unsuccessfully.
    #[error("git {command} failed: {message}")]
    Git { command: String, message: String },

    /// An external program could not be started.
    #[error("failed to run {program}. Is it installed?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command deadline expired; in-flight processes were killed.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Result alias used across the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;
