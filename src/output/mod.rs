//! Output module for progress reporting and run summaries
//!
//! This module handles:
//! - Reporting progress to the console through `tracing`
//! - Emitting GitHub Actions workflow commands and step summaries
//! - Generating markdown summaries of fetch and compile runs

mod console;
mod github;
mod markdown;
mod traits;

pub use console::ConsoleReporter;
pub use github::{format_command, running_in_github_actions, GithubReporter};
pub use markdown::{format_compile_summary, format_fetch_summary};
pub use traits::{OutputError, OutputResult, Reporter};

/// Picks the reporter for this run
///
/// The CI reporter is used when requested or when running inside GitHub
/// Actions.
pub fn select_reporter(gh_action: bool) -> Box<dyn Reporter> {
    if gh_action || running_in_github_actions() {
        Box::new(GithubReporter::from_env())
    } else {
        Box::new(ConsoleReporter)
    }
}
