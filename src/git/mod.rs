//! Access to the local git checkout.
//!
//! Everything the tool needs from git goes through [`GitAccess`], so the
//! branch and remote logic can run against canned output in tests.
//! [`GitCli`] is the production implementation backed by the `git` binary.

mod branch;
mod cli;
mod remote;

pub use branch::{
    all_branches,
    branch_exists,
    normalize_branch_line,
};
pub use cli::GitCli;
pub use remote::{
    RepoId,
    current_repo,
    parse_repo_from_url,
};

use crate::error::Result;

/// Name of the remote whose URL identifies the hosted repository.
pub const DEFAULT_REMOTE: &str = "origin";

/// Where a ref is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefScope {
    /// `refs/heads/<name>`
    Local,
    /// `refs/remotes/origin/<name>`
    Remote,
}

impl RefScope {
    /// Fully qualified ref name for `name` in this scope.
    pub fn qualify(self, name: &str) -> String {
        match self {
            RefScope::Local => format!("refs/heads/{}", name),
            RefScope::Remote => format!("refs/remotes/{}/{}", DEFAULT_REMOTE, name),
        }
    }
}

/// The git operations the tool consumes.
#[allow(async_fn_in_trait)]
pub trait GitAccess {
    /// URL configured for `remote`.
    async fn remote_url(&self, remote: &str) -> Result<String>;

    /// Short name of the checked-out branch.
    ///
    /// Fails with [`Error::NoCurrentBranch`](crate::Error::NoCurrentBranch)
    /// when HEAD is detached. An unborn branch still has a name.
    async fn current_branch(&self) -> Result<String>;

    /// Whether `name` exists in `scope`. Absence is `Ok(false)`, not an
    /// error.
    async fn ref_exists(&self, scope: RefScope, name: &str) -> Result<bool>;

    /// Raw `git branch -a` lines, most recently committed first.
    async fn list_branches_by_recency(&self) -> Result<Vec<String>>;
}
