//! [`GitAccess`] backed by the `git` command-line tool.

use std::path::PathBuf;
use std::process::{
    Output,
    Stdio,
};

use tokio::process::Command;

use super::{
    GitAccess,
    RefScope,
};
use crate::error::{
    Error,
    Result,
};

/// Runs `git` as a child process, optionally inside a specific directory.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    repo_dir: Option<PathBuf>,
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git commands inside `dir` instead of the current directory.
    #[must_use]
    pub fn with_repo_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = Some(dir.into());
        self
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run git and capture its output regardless of exit status.
    async fn output(&self, args: &[&str]) -> Result<Output> {
        self.command(args)
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: "git".to_string(),
                source,
            })
    }

    /// Run git and return trimmed stdout, failing on a non-zero exit.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(command_failed(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn command_failed(args: &[&str], output: &Output) -> Error {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Error::Git {
        command: args.first().copied().unwrap_or_default().to_string(),
        message: if stderr.is_empty() {
            output.status.to_string()
        } else {
            stderr
        },
    }
}

impl GitAccess for GitCli {
    async fn remote_url(&self, remote: &str) -> Result<String> {
        self.run(&["remote", "get-url", remote]).await
    }

    async fn current_branch(&self) -> Result<String> {
        let branch = self.run(&["branch", "--show-current"]).await?;
        if branch.is_empty() {
            return Err(Error::NoCurrentBranch);
        }
        Ok(branch)
    }

    async fn ref_exists(&self, scope: RefScope, name: &str) -> Result<bool> {
        let qualified = scope.qualify(name);
        let args = ["show-ref", "--verify", "--quiet", qualified.as_str()];
        let output = self.output(&args).await?;
        match output.status.code() {
            Some(0) => Ok(true),
            // show-ref exits 1 when the ref is missing
            Some(1) => Ok(false),
            _ => Err(command_failed(&args, &output)),
        }
    }

    async fn list_branches_by_recency(&self) -> Result<Vec<String>> {
        let listing = self
            .run(&["branch", "-a", "--sort=-committerdate"])
            .await?;
        Ok(listing.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::process::Command as StdCommand;

    use super::*;
    use crate::git::{
        all_branches,
        branch_exists,
        current_repo,
    };

    fn git_available() -> bool {
        StdCommand::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = StdCommand::new("git")
            .args([
                "-c",
                "user.name=Test",
                "-c",
                "user.email=test@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .current_dir(dir)
            .output()
            .expect("Failed to run git");
        assert!(status.status.success(), "git {:?} failed", args);
    }

    /// A repo on `main` with a local `develop` branch and an origin-only
    /// `feature/x` remote-tracking ref.
    fn create_test_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let path = dir.path();
        git(path, &["init", "--quiet"]);
        git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(path, &["commit", "--allow-empty", "--quiet", "-m", "initial"]);
        git(path, &["branch", "develop"]);
        git(
            path,
            &["remote", "add", "origin", "git@github.com:owner/repo.git"],
        );
        git(path, &["update-ref", "refs/remotes/origin/feature/x", "HEAD"]);
        dir
    }

    #[tokio::test]
    async fn test_current_branch_in_real_repo() {
        if !git_available() {
            return;
        }
        let dir = create_test_repo();
        let git = GitCli::new().with_repo_dir(dir.path());
        assert_eq!(git.current_branch().await.unwrap(), "main");
    }

    #[tokio::test]
    async fn test_detached_head_has_no_current_branch() {
        if !git_available() {
            return;
        }
        let dir = create_test_repo();
        git(dir.path(), &["checkout", "--quiet", "--detach"]);
        let cli = GitCli::new().with_repo_dir(dir.path());
        assert!(matches!(
            cli.current_branch().await,
            Err(Error::NoCurrentBranch)
        ));
    }

    #[tokio::test]
    async fn test_unborn_branch_is_current() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "--quiet"]);
        git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/trunk"]);
        let cli = GitCli::new().with_repo_dir(dir.path());
        assert_eq!(cli.current_branch().await.unwrap(), "trunk");
    }

    #[tokio::test]
    async fn test_all_branches_in_real_repo() {
        if !git_available() {
            return;
        }
        let dir = create_test_repo();
        let git = GitCli::new().with_repo_dir(dir.path());
        let branches = all_branches(&git).await.unwrap();
        for expected in ["main", "develop", "feature/x"] {
            assert!(
                branches.iter().any(|b| b == expected),
                "{expected} missing from {branches:?}"
            );
        }
        assert!(branches.iter().all(|b| !b.contains("HEAD")));
    }

    #[tokio::test]
    async fn test_branch_exists_in_real_repo() {
        if !git_available() {
            return;
        }
        let dir = create_test_repo();
        let git = GitCli::new().with_repo_dir(dir.path());
        assert!(branch_exists(&git, "develop").await.unwrap());
        assert!(branch_exists(&git, "feature/x").await.unwrap());
        assert!(!branch_exists(&git, "nonexistent").await.unwrap());
    }

    #[tokio::test]
    async fn test_current_repo_in_real_repo() {
        if !git_available() {
            return;
        }
        let dir = create_test_repo();
        let git = GitCli::new().with_repo_dir(dir.path());
        assert_eq!(current_repo(&git).await.unwrap().to_string(), "owner/repo");
    }

    #[tokio::test]
    async fn test_ref_exists_outside_repo_is_an_error() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new().with_repo_dir(dir.path());
        let result = git.ref_exists(RefScope::Local, "main").await;
        assert!(matches!(result, Err(Error::Git { .. })));
    }
}
