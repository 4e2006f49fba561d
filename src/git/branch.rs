//! Branch listing and existence checks.

use super::{
    DEFAULT_REMOTE,
    GitAccess,
    RefScope,
};
use crate::error::Result;

/// Clean one line of `git branch -a` output into a branch name.
///
/// Returns `None` for lines that do not name a branch: blank lines,
/// symbolic refs (`origin/HEAD -> origin/main`) and detached-HEAD markers.
/// Remote-tracking entries on origin collapse to their short name, so
/// `remotes/origin/feature/x` becomes `feature/x`.
pub fn normalize_branch_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.contains("HEAD ->") {
        return None;
    }

    // `*` marks the current branch, `+` one checked out in another worktree
    let line = line
        .strip_prefix("* ")
        .or_else(|| line.strip_prefix("+ "))
        .unwrap_or(line)
        .trim_start();

    // (HEAD detached at 1a2b3c)
    if line.starts_with('(') {
        return None;
    }

    let line = line.strip_prefix("remotes/").unwrap_or(line);
    let line = line
        .strip_prefix(DEFAULT_REMOTE)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(line)
        .trim();

    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

/// All local and origin branches, most recently committed first.
///
/// A branch that exists both locally and on origin appears twice.
pub async fn all_branches<G: GitAccess>(git: &G) -> Result<Vec<String>> {
    let lines = git.list_branches_by_recency().await?;
    Ok(lines
        .iter()
        .filter_map(|line| normalize_branch_line(line))
        .collect())
}

/// Whether `name` exists locally or as an origin remote-tracking branch.
///
/// The remote is only consulted when the local lookup misses.
pub async fn branch_exists<G: GitAccess>(git: &G, name: &str) -> Result<bool> {
    if git.ref_exists(RefScope::Local, name).await? {
        return Ok(true);
    }
    git.ref_exists(RefScope::Remote, name).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeGit;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_current_branch_marker() {
        assert_eq!(normalize_branch_line("* main").as_deref(), Some("main"));
    }

    #[test]
    fn test_normalize_origin_prefix() {
        assert_eq!(
            normalize_branch_line("  origin/feature/x").as_deref(),
            Some("feature/x")
        );
    }

    #[test]
    fn test_normalize_remotes_prefix() {
        assert_eq!(
            normalize_branch_line("  remotes/origin/feature/x").as_deref(),
            Some("feature/x")
        );
    }

    #[test]
    fn test_normalize_keeps_other_remotes() {
        assert_eq!(
            normalize_branch_line("  remotes/upstream/main").as_deref(),
            Some("upstream/main")
        );
    }

    #[test]
    fn test_normalize_does_not_strip_partial_origin() {
        assert_eq!(
            normalize_branch_line("  originals/main").as_deref(),
            Some("originals/main")
        );
    }

    #[test]
    fn test_normalize_drops_symbolic_ref() {
        assert_eq!(normalize_branch_line("origin/HEAD -> origin/main"), None);
        assert_eq!(
            normalize_branch_line("  remotes/origin/HEAD -> origin/main"),
            None
        );
    }

    #[test]
    fn test_normalize_drops_blank_lines() {
        assert_eq!(normalize_branch_line(""), None);
        assert_eq!(normalize_branch_line("   \t"), None);
    }

    #[test]
    fn test_normalize_drops_detached_head() {
        assert_eq!(normalize_branch_line("* (HEAD detached at 1a2b3c4)"), None);
    }

    #[test]
    fn test_normalize_worktree_marker() {
        assert_eq!(normalize_branch_line("+ hotfix").as_deref(), Some("hotfix"));
    }

    #[test]
    fn test_normalize_bare_origin_prefix_is_dropped() {
        assert_eq!(normalize_branch_line("origin/"), None);
    }

    #[tokio::test]
    async fn test_all_branches_normalizes_in_order() {
        let git = FakeGit {
            listing: lines(&["  main", "  develop", "  origin/feature/branch1"]),
            ..Default::default()
        };
        let branches = all_branches(&git).await.unwrap();
        assert_eq!(branches, vec!["main", "develop", "feature/branch1"]);
    }

    #[tokio::test]
    async fn test_all_branches_keeps_local_and_remote_duplicates() {
        let git = FakeGit {
            listing: lines(&[
                "* main",
                "  remotes/origin/HEAD -> origin/main",
                "  remotes/origin/main",
                "",
            ]),
            ..Default::default()
        };
        let branches = all_branches(&git).await.unwrap();
        assert_eq!(branches, vec!["main", "main"]);
    }

    #[tokio::test]
    async fn test_all_branches_propagates_listing_failure() {
        let git = FakeGit {
            fail_listing: true,
            ..Default::default()
        };
        assert!(all_branches(&git).await.is_err());
    }

    #[tokio::test]
    async fn test_branch_exists_locally_skips_remote() {
        let git = FakeGit {
            local: lines(&["main"]),
            ..Default::default()
        };
        assert!(branch_exists(&git, "main").await.unwrap());
        assert_eq!(git.calls(), vec!["ref_exists refs/heads/main"]);
    }

    #[tokio::test]
    async fn test_branch_exists_on_remote_only() {
        let git = FakeGit {
            remote: lines(&["feature/x"]),
            ..Default::default()
        };
        assert!(branch_exists(&git, "feature/x").await.unwrap());
        assert_eq!(
            git.calls(),
            vec![
                "ref_exists refs/heads/feature/x",
                "ref_exists refs/remotes/origin/feature/x",
            ]
        );
    }

    #[tokio::test]
    async fn test_branch_missing_everywhere() {
        let git = FakeGit::default();
        assert!(!branch_exists(&git, "nonexistent").await.unwrap());
    }

    #[tokio::test]
    async fn test_branch_exists_propagates_tool_failure() {
        let git = FakeGit {
            fail_exists: true,
            ..Default::default()
        };
        assert!(branch_exists(&git, "main").await.is_err());
    }
}
