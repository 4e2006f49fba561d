//! Choosing the branch whose pull requests are listed.
//!
//! There are three mutually exclusive ways to pick it:
//!
//! | Mode | Trigger | Result |
//! |---|---|---|
//! | [`SelectionMode::Interactive`] | `-i` | item chosen from [`all_branches`] |
//! | [`SelectionMode::Current`] | no argument | the checked-out branch |
//! | [`SelectionMode::Explicit`] | `<branch>` | the argument, if it exists |

use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;

use crate::error::{
    Error,
    Result,
};
use crate::git::{
    GitAccess,
    all_branches,
    branch_exists,
};

/// Number of branches shown at once by the interactive picker.
const PICKER_PAGE_SIZE: usize = 10;

/// How the target branch was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Interactive,
    Current,
    Explicit,
}

impl SelectionMode {
    /// Pick the mode from the command line. `-i` wins over a positional
    /// argument.
    pub fn from_args(branch: Option<&str>, interactive: bool) -> Self {
        match (interactive, branch) {
            (true, _) => SelectionMode::Interactive,
            (false, None) => SelectionMode::Current,
            (false, Some(_)) => SelectionMode::Explicit,
        }
    }

    /// Label printed in front of the resolved branch name.
    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::Interactive => "Selected branch",
            SelectionMode::Current => "Using current branch",
            SelectionMode::Explicit => "Target branch",
        }
    }
}

/// A resolved branch and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub branch: String,
    pub mode: SelectionMode,
}

/// Single-choice prompt over a list of branch names.
pub trait BranchPicker {
    /// Returns the chosen item, or `Ok(None)` when the user backs out.
    fn pick(&self, branches: &[String]) -> Result<Option<String>>;
}

/// Terminal picker built on `dialoguer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPicker;

impl BranchPicker for TerminalPicker {
    fn pick(&self, branches: &[String]) -> Result<Option<String>> {
        let theme = ColorfulTheme::default();
        let chosen = tokio::task::block_in_place(|| {
            Select::with_theme(&theme)
                .with_prompt("Select branch")
                .items(branches)
                .default(0)
                .max_length(PICKER_PAGE_SIZE)
                .interact_opt()
        })
        .map_err(|e| Error::SelectionCancelled(Some(e.to_string())))?;

        Ok(chosen.and_then(|index| branches.get(index).cloned()))
    }
}

/// Resolve the target branch.
///
/// # Errors
///
/// - Interactive: [`Error::NoBranches`] for an empty listing,
///   [`Error::SelectionCancelled`] when the picker is dismissed; listing
///   failures propagate.
/// - Current: [`Error::NoCurrentBranch`] on a detached HEAD.
/// - Explicit: [`Error::BranchNotFound`] when the branch exists neither
///   locally nor on origin, [`Error::ExistenceCheckFailed`] when the check
///   itself fails.
pub async fn select_branch<G, P>(
    git: &G,
    picker: &P,
    branch: Option<&str>,
    interactive: bool,
) -> Result<Selection>
where
    G: GitAccess,
    P: BranchPicker + ?Sized,
{
    let mode = SelectionMode::from_args(branch, interactive);
    let branch = match (mode, branch) {
        (SelectionMode::Interactive, _) => {
            let branches = all_branches(git).await?;
            if branches.is_empty() {
                return Err(Error::NoBranches);
            }
            picker
                .pick(&branches)?
                .ok_or(Error::SelectionCancelled(None))?
        }
        (SelectionMode::Explicit, Some(name)) => {
            let exists = branch_exists(git, name)
                .await
                .map_err(|e| Error::ExistenceCheckFailed(Box::new(e)))?;
            if !exists {
                return Err(Error::BranchNotFound(name.to_string()));
            }
            name.to_string()
        }
        _ => git.current_branch().await?,
    };

    Ok(Selection { branch, mode })
}
