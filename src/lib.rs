#![doc = include_str!("../README.md")]

/// Clipboard output.
pub mod clipboard;
/// Command implementations and argument types.
pub mod commands;
/// Shell completion for the branch argument.
pub mod completion;
/// Time budget shared by the steps of a command.
pub mod deadline;
/// Error kinds.
pub mod error;
/// Local git checkout access.
pub mod git;
/// GitHub pull request queries.
pub mod github;
/// Target branch selection.
pub mod selector;

pub use error::{
    Error,
    Result,
};
