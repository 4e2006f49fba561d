//! Copy the links of pull requests targeting a git branch to the clipboard.
//!
//! The branch is resolved from the command line, the current checkout or an
//! interactive picker; the repository from the `origin` remote. Pull
//! requests are fetched with `gh api` and rendered with `jq`.

use std::path::Path;

use clap::{
    CommandFactory,
    Parser,
};
use clap_complete::env::CompleteEnv;
use gh_topic_urls::commands::{
    self,
    TopicUrlsArgs,
};
use gh_topic_urls::{
    clipboard,
    completion,
};

#[derive(Parser, Debug)]
#[command(
    name = "gh-topic-urls",
    version,
    about = "Copy the links of pull requests targeting a branch to the clipboard"
)]
struct Cli {
    #[command(flatten)]
    args: TopicUrlsArgs,
}

/// Env files loaded before parsing, when present in the current directory.
const ENV_FILES: [&str; 2] = [".env", ".env.local"];

fn has_env_files(dir: &Path) -> bool {
    ENV_FILES.iter().any(|name| dir.join(name).is_file())
}

fn main() {
    match clipboard::serve_if_owner() {
        Ok(true) => return,
        Ok(false) => {}
        Err(_) => std::process::exit(1),
    }

    // Exits early when invoked by a shell completion hook
    CompleteEnv::with_factory(|| completion::completion_command_from_env(Cli::command()))
        .complete();

    // GH_TOKEN and GH_TOPIC_URLS_TIMEOUT may live in .env files
    if std::env::current_dir().is_ok_and(|dir| has_env_files(&dir))
        && let Err(e) = dotenvage::EnvLoader::new().and_then(|loader| loader.load())
    {
        eprintln!("Warning: Failed to load/decrypt env files: {}", e);
        eprintln!("Continuing with existing environment variables...");
    }

    let cli = Cli::parse();

    if let Err(e) = commands::topic_urls(cli.args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_env_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_env_files(dir.path()));

        std::fs::write(dir.path().join(".env.prod"), "A=1").unwrap();
        assert!(!has_env_files(dir.path()));

        std::fs::write(dir.path().join(".env.local"), "A=1").unwrap();
        assert!(has_env_files(dir.path()));
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    #[serial_test::serial]
    fn test_cli_interactive_long_flag() {
        let cli = Cli::try_parse_from(["gh-topic-urls", "--interactive"]).unwrap();
        assert!(cli.args.interactive);
    }
}
