//! List the pull requests targeting a branch and copy their links.
//!
//! The branch is the current one, a named one, or picked interactively. The
//! repository comes from the `origin` remote unless `--owner`/`--repo` are
//! given. Links are printed as a markdown list and copied to the clipboard.
//!
//! # Examples
//!
//! ```bash
//! # Pull requests targeting the checked-out branch
//! gh-topic-urls
//!
//! # Pull requests targeting a named branch (local or on origin)
//! gh-topic-urls feature/login
//!
//! # Pick the branch from a list
//! gh-topic-urls -i
//!
//! # Machine-readable output, clipboard untouched
//! gh-topic-urls main --format json --no-copy
//! ```

use std::io::Write;
use std::time::Duration;

use anyhow::{
    Context,
    Result,
};
use cargo_plugin_utils::logger::Logger;
use clap::Parser;
use clap_complete::engine::ArgValueCompleter;
use serde::Serialize;

use super::common::{
    USAGE_HINT,
    get_owner_repo,
    links_from_list,
};
use crate::clipboard::{
    ClipboardSink,
    SystemClipboard,
};
use crate::completion::BranchCompleter;
use crate::deadline::{
    COMMAND_TIMEOUT,
    Deadline,
};
use crate::error::Error;
use crate::git::{
    GitAccess,
    GitCli,
    RepoId,
};
use crate::github::{
    GhJqSource,
    PullRequestQuery,
    PullRequestSource,
};
use crate::selector::{
    BranchPicker,
    SelectionMode,
    TerminalPicker,
    select_branch,
};

/// Arguments for the `gh-topic-urls` command.
#[derive(Parser, Debug, Clone)]
pub struct TopicUrlsArgs {
    /// Base branch of the pull requests.
    ///
    /// Defaults to the current branch. Must exist locally or as an `origin`
    /// remote-tracking branch. Ignored with `--interactive`.
    #[arg(value_name = "BRANCH", add = ArgValueCompleter::new(BranchCompleter))]
    pub branch: Option<String>,

    /// Interactive branch selection.
    #[arg(short, long)]
    pub interactive: bool,

    /// Seconds before the whole command gives up.
    ///
    /// Running git, gh and jq processes are killed when it expires.
    #[arg(
        long,
        env = "GH_TOPIC_URLS_TIMEOUT",
        default_value_t = COMMAND_TIMEOUT.as_secs(),
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Print the links without copying them to the clipboard.
    #[arg(long)]
    pub no_copy: bool,

    /// Output format.
    ///
    /// - `list`: markdown list, one `- <url>` line per pull request
    /// - `json`: `{"repository":..,"branch":..,"links":[..]}`
    #[arg(long, default_value = "list")]
    pub format: String,

    /// GitHub repository owner.
    ///
    /// Defaults to the owner in the `origin` remote URL.
    #[arg(long)]
    pub owner: Option<String>,

    /// GitHub repository name.
    ///
    /// Defaults to the repository in the `origin` remote URL.
    #[arg(long)]
    pub repo: Option<String>,
}

/// How the result is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    List,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self> {
        match format {
            "list" => Ok(OutputFormat::List),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!("Invalid format: {}", format),
        }
    }
}

/// Everything gathered before output is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub repo: RepoId,
    pub branch: String,
    pub mode: SelectionMode,
    /// `- <url>` lines as rendered by the query filter.
    pub links: String,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.links.trim().is_empty()
    }
}

/// What happened to a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing matched; the clipboard was left alone.
    Empty,
    /// Printed only (`--no-copy`).
    Printed,
    /// Printed and copied to the clipboard.
    Copied,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    repository: String,
    branch: &'a str,
    links: Vec<String>,
}

/// Resolve the branch and query its pull requests.
///
/// # Errors
///
/// Returns an error if:
/// - The branch cannot be resolved (see [`select_branch`])
/// - The repository cannot be derived from the `origin` remote
/// - The `gh api` or `jq` process fails
/// - The `--timeout` budget runs out
///
/// # Examples
///
/// ```text
/// Using current branch: main
/// ```
pub async fn gather<G, P, Q>(
    git: &G,
    picker: &P,
    source: &Q,
    args: &TopicUrlsArgs,
    logger: &mut Logger,
) -> Result<Report>
where
    G: GitAccess,
    P: BranchPicker + ?Sized,
    Q: PullRequestSource,
{
    let deadline = Deadline::after(Duration::from_secs(args.timeout));

    let selection = deadline
        .run(select_branch(
            git,
            picker,
            args.branch.as_deref(),
            args.interactive,
        ))
        .await
        .map_err(|e| selection_error(e, args.interactive))?;

    logger.print_message(&format!("{}: {}", selection.mode.label(), selection.branch));

    let repo = get_owner_repo(git, &deadline, args.owner.as_deref(), args.repo.as_deref())
        .await
        .context("failed to get pull requests")?;

    logger.status("Querying", &format!("pull requests into {}", selection.branch));
    let query = PullRequestQuery::new(repo, selection.branch.clone());
    let links = deadline
        .run(source.links(&query))
        .await
        .context("failed to get pull requests")?;
    logger.finish();

    Ok(Report {
        repo: query.repo,
        branch: selection.branch,
        mode: selection.mode,
        links,
    })
}

fn selection_error(err: Error, interactive: bool) -> anyhow::Error {
    let err = anyhow::Error::new(err);
    if interactive {
        err.context("branch selection failed")
    } else {
        anyhow::anyhow!("failed to get branch: {:#}. {}", err, USAGE_HINT)
    }
}

/// Write `report` to `out` and, unless `clipboard` is `None`, copy the link
/// list.
///
/// An empty report prints a notice (or an empty JSON list) and never
/// touches the clipboard.
pub fn deliver(
    out: &mut dyn Write,
    report: &Report,
    format: OutputFormat,
    clipboard: Option<&dyn ClipboardSink>,
) -> Result<Delivery> {
    match format {
        OutputFormat::List if report.is_empty() => {
            writeln!(out, "No pull requests found for branch '{}'", report.branch)?;
        }
        OutputFormat::List => write!(out, "{}", report.links)?,
        OutputFormat::Json => {
            let json = JsonReport {
                repository: report.repo.to_string(),
                branch: &report.branch,
                links: links_from_list(&report.links),
            };
            writeln!(out, "{}", serde_json::to_string(&json)?)?;
        }
    }
    out.flush()?;

    if report.is_empty() {
        return Ok(Delivery::Empty);
    }
    let Some(clipboard) = clipboard else {
        return Ok(Delivery::Printed);
    };
    clipboard
        .write_text(&report.links)
        .context("failed to get pull requests")?;
    Ok(Delivery::Copied)
}

/// List the pull requests targeting a branch and copy their links.
///
/// # Errors
///
/// Returns an error if the branch, the repository or the pull requests
/// cannot be resolved, if the clipboard cannot be written, or if `--format`
/// is not `list` or `json`.
///
/// # Example Output
///
/// ```text
/// Target branch: main
/// - https://github.com/owner/repo/pull/12
/// - https://github.com/owner/repo/pull/15
/// ✨ Copied to clipboard
/// ```
pub fn topic_urls(args: TopicUrlsArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let mut logger = Logger::new();

    let report = rt.block_on(gather(
        &GitCli::new(),
        &TerminalPicker,
        &GhJqSource::new(),
        &args,
        &mut logger,
    ))?;

    let clipboard: Option<&dyn ClipboardSink> = if args.no_copy {
        None
    } else {
        Some(&SystemClipboard)
    };
    let delivery = deliver(&mut std::io::stdout().lock(), &report, format, clipboard)?;

    if delivery == Delivery::Copied {
        logger.print_message("✨ Copied to clipboard");
    }

    Ok(())
}
