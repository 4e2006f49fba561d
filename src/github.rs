//! Pull request queries through the `gh` CLI.
//!
//! The GitHub REST API is reached with `gh api`, whose JSON output is piped
//! straight into `jq` to render one `- <url>` line per pull request.

use std::process::Stdio;

use tokio::process::Command;

use crate::error::{
    Error,
    Result,
};
use crate::git::RepoId;

const GH_ACCEPT_HEADER: &str = "Accept: application/vnd.github+json";
const GH_API_VERSION_HEADER: &str = "X-GitHub-Api-Version: 2022-11-28";
const LINK_FILTER: &str = r#""- " + .[].html_url"#;

/// Pull requests of a repository targeting one base branch, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestQuery {
    pub repo: RepoId,
    pub base: String,
}

impl PullRequestQuery {
    pub fn new(repo: RepoId, base: impl Into<String>) -> Self {
        Self {
            repo,
            base: base.into(),
        }
    }

    /// REST path for `gh api`. The base branch is percent-encoded since git
    /// allows `&`, `+` and `#` in branch names.
    pub fn api_path(&self) -> String {
        format!(
            "/repos/{}/pulls?state=all&base={}&sort=created-asc",
            self.repo,
            urlencoding::encode(&self.base)
        )
    }
}

/// Something that turns a [`PullRequestQuery`] into `- <url>` lines.
#[allow(async_fn_in_trait)]
pub trait PullRequestSource {
    /// Newline-separated `- <url>` lines; empty when nothing matched.
    async fn links(&self, query: &PullRequestQuery) -> Result<String>;
}

/// `gh api ... | jq -r '"- " + .[].html_url'`
#[derive(Debug, Clone)]
pub struct GhJqSource {
    gh: String,
    jq: String,
}

impl Default for GhJqSource {
    fn default() -> Self {
        Self {
            gh: "gh".to_string(),
            jq: "jq".to_string(),
        }
    }
}

impl GhJqSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn gh_command(&self, query: &PullRequestQuery) -> Command {
        let mut cmd = Command::new(&self.gh);
        cmd.args([
            "api",
            "-H",
            GH_ACCEPT_HEADER,
            "-H",
            GH_API_VERSION_HEADER,
            &query.api_path(),
        ]);
        cmd
    }

    fn jq_command(&self) -> Command {
        let mut cmd = Command::new(&self.jq);
        cmd.args(["-r", LINK_FILTER]);
        cmd
    }
}

impl PullRequestSource for GhJqSource {
    async fn links(&self, query: &PullRequestQuery) -> Result<String> {
        pipe(self.gh_command(query), self.jq_command()).await
    }
}

fn program_name(cmd: &Command) -> String {
    cmd.as_std().get_program().to_string_lossy().into_owned()
}

fn spawn_error(program: &str) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Spawn {
        program: program.to_string(),
        source,
    }
}

fn query_failed(program: &str, status: std::process::ExitStatus, stderr: &[u8]) -> Error {
    Error::QueryFailed {
        program: program.to_string(),
        status: status.to_string(),
        message: String::from_utf8_lossy(stderr).trim().to_string(),
    }
}

/// Run `producer | consumer` and return the consumer's stdout.
///
/// The producer is started first and its stdout handed to the consumer.
/// Both processes are awaited before anything is returned; a producer
/// failure is reported ahead of a consumer failure. Both children are
/// killed if the returned future is dropped.
pub async fn pipe(mut producer: Command, mut consumer: Command) -> Result<String> {
    let producer_name = program_name(&producer);
    let consumer_name = program_name(&consumer);

    let mut upstream = producer
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(spawn_error(&producer_name))?;

    let stdout = upstream.stdout.take().ok_or_else(|| Error::QueryFailed {
        program: producer_name.clone(),
        status: "running".to_string(),
        message: "stdout was not captured".to_string(),
    })?;
    let handoff: Stdio =
        TryInto::<Stdio>::try_into(stdout).map_err(spawn_error(&producer_name))?;

    let downstream = consumer
        .stdin(handoff)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(spawn_error(&consumer_name))?;
    // the command still holds the pipe's read end
    drop(consumer);

    let (upstream, downstream) = tokio::join!(
        upstream.wait_with_output(),
        downstream.wait_with_output()
    );
    let upstream = upstream.map_err(spawn_error(&producer_name))?;
    let downstream = downstream.map_err(spawn_error(&consumer_name))?;

    if !upstream.status.success() {
        return Err(query_failed(&producer_name, upstream.status, &upstream.stderr));
    }
    if !downstream.status.success() {
        return Err(query_failed(&consumer_name, downstream.status, &downstream.stderr));
    }

    Ok(String::from_utf8_lossy(&downstream.stdout).into_owned())
}
