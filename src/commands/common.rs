//! Common helper functions shared across commands.

use anyhow::{
    Context,
    Result,
};

use crate::deadline::Deadline;
use crate::git::{
    GitAccess,
    RepoId,
    current_repo,
};

/// Usage hint appended to non-interactive branch resolution failures.
pub const USAGE_HINT: &str = "Usage: gh-topic-urls [branch-name] or gh-topic-urls -i";

/// Get owner and repo from args, or from the `origin` remote.
pub async fn get_owner_repo<G: GitAccess>(
    git: &G,
    deadline: &Deadline,
    owner: Option<&str>,
    repo: Option<&str>,
) -> Result<RepoId> {
    match (owner, repo) {
        (Some(o), Some(r)) => {
            if o.is_empty() || r.is_empty() || r.contains('/') {
                anyhow::bail!("Invalid repository: {}/{}", o, r);
            }
            Ok(RepoId::new(o, r))
        }
        (Some(_), None) | (None, Some(_)) => {
            anyhow::bail!("Both --owner and --repo must be provided together");
        }
        (None, None) => deadline
            .run(current_repo(git))
            .await
            .context("failed to get current repository"),
    }
}

/// Strip the `- ` bullets from the rendered link list.
pub fn links_from_list(list: &str) -> Vec<String> {
    list.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.strip_prefix("- ").unwrap_or(line).to_string())
        .collect()
}
