//! Shell completion for the branch argument.
//!
//! Completion is driven by `clap_complete`'s dynamic engine: running the
//! binary with `COMPLETE=<shell>` prints a registration script, after which
//! the shell calls back into the binary for candidates.

use std::ffi::{
    OsStr,
    OsString,
};

use clap::Command;
use clap_complete::engine::{
    CompletionCandidate,
    ValueCompleter,
};

use crate::deadline::{
    COMPLETION_TIMEOUT,
    Deadline,
};
use crate::git::{
    GitAccess,
    GitCli,
    all_branches,
};

/// Command used to answer a completion request.
///
/// Once a branch has been typed nothing else is suggested, not even flags,
/// so the returned command has no arguments at all in that case. `words`
/// starts with the binary name; `index` is the position being completed.
pub fn completion_command(cmd: Command, words: &[OsString], index: usize) -> Command {
    let preceding = words.get(1..index).unwrap_or_default();
    if has_branch_argument(&cmd, preceding) {
        Command::new(env!("CARGO_PKG_NAME"))
            .disable_help_flag(true)
            .disable_version_flag(true)
    } else {
        cmd
    }
}

/// [`completion_command`] for the request described by the process
/// arguments, as passed by a `COMPLETE=<shell>` hook.
pub fn completion_command_from_env(cmd: Command) -> Command {
    let args: Vec<OsString> = std::env::args_os().collect();
    let Some(escape) = args.iter().position(|a| a == "--") else {
        return cmd;
    };
    let words = &args[escape + 1..];
    // bash, elvish and powershell pass the cursor position; the others
    // complete the last word
    let index = std::env::var("_CLAP_COMPLETE_INDEX")
        .ok()
        .and_then(|i| i.parse().ok())
        .unwrap_or_else(|| words.len().saturating_sub(1));
    completion_command(cmd, words, index)
}

/// Whether `words` (without the binary name) already hold a positional.
fn has_branch_argument(cmd: &Command, words: &[OsString]) -> bool {
    let mut words = words.iter().map(|w| w.to_string_lossy());
    while let Some(word) = words.next() {
        if word == "--" {
            return words.next().is_some();
        }
        if let Some(long) = word.strip_prefix("--") {
            if !long.contains('=') && takes_value(cmd, |a| a.get_long() == Some(long)) {
                words.next();
            }
            continue;
        }
        if let Some(shorts) = word.strip_prefix('-')
            && !shorts.is_empty()
        {
            let mut chars = shorts.chars();
            if let (Some(c), None) = (chars.next(), chars.next())
                && takes_value(cmd, |a| a.get_short() == Some(c))
            {
                words.next();
            }
            continue;
        }
        return true;
    }
    false
}

fn takes_value(cmd: &Command, matches: impl Fn(&clap::Arg) -> bool) -> bool {
    cmd.get_arguments()
        .find(|a| matches(a))
        .is_some_and(|a| a.get_action().takes_values())
}

/// Completes branch names from the local and origin branch listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchCompleter;

impl ValueCompleter for BranchCompleter {
    fn complete(&self, current: &OsStr) -> Vec<CompletionCandidate> {
        // an option is being typed, not a branch
        if current.to_str().is_some_and(|s| s.starts_with('-')) {
            return Vec::new();
        }

        let prefix = current.to_string_lossy();
        matching_branches(&GitCli::new(), &prefix)
            .into_iter()
            .map(CompletionCandidate::new)
            .collect()
    }
}

/// Branches starting with `prefix`, in listing order.
///
/// Any failure, including running past [`COMPLETION_TIMEOUT`], yields no
/// candidates.
pub fn matching_branches<G: GitAccess>(git: &G, prefix: &str) -> Vec<String> {
    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return Vec::new();
    };

    let branches = rt.block_on(async {
        Deadline::after(COMPLETION_TIMEOUT)
            .run(all_branches(git))
            .await
    });

    branches
        .unwrap_or_default()
        .into_iter()
        .filter(|branch| branch.starts_with(prefix))
        .collect()
}
