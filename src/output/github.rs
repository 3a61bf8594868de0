//! GitHub Actions reporter
//!
//! Emits workflow commands on stdout (`::warning title=...::message`) and
//! appends run summaries to the file named by `GITHUB_STEP_SUMMARY`.

use crate::output::traits::{OutputResult, Reporter};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Environment variable set by GitHub Actions on every runner
pub const GITHUB_ACTIONS_ENV: &str = "GITHUB_ACTIONS";

/// Environment variable naming the job summary file
pub const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";

/// Whether the process runs inside GitHub Actions
pub fn running_in_github_actions() -> bool {
    std::env::var(GITHUB_ACTIONS_ENV).map_or(false, |v| v == "true")
}

/// Reporter emitting GitHub workflow commands
#[derive(Debug, Clone, Default)]
pub struct GithubReporter {
    summary_path: Option<PathBuf>,
}

impl GithubReporter {
    pub fn new(summary_path: Option<PathBuf>) -> Self {
        Self { summary_path }
    }

    /// Creates a reporter writing summaries where the runner expects them
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(STEP_SUMMARY_ENV).map(PathBuf::from))
    }

    fn emit(&self, line: String) {
        println!("{}", line);
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Formats a workflow command such as `::error title=T::message`
pub fn format_command(command: &str, title: Option<&str>, message: &str) -> String {
    match title {
        Some(title) if !title.is_empty() => format!(
            "::{} title={}::{}",
            command,
            escape_property(title),
            escape_data(message)
        ),
        _ => format!("::{}::{}", command, escape_data(message)),
    }
}

impl Reporter for GithubReporter {
    fn info(&self, message: &str) {
        self.emit(message.to_string());
    }

    fn notice(&self, title: &str, message: &str) {
        self.emit(format_command("notice", Some(title), message));
    }

    fn warn(&self, title: &str, message: &str) {
        self.emit(format_command("warning", Some(title), message));
    }

    fn error(&self, title: &str, message: &str) {
        self.emit(format_command("error", Some(title), message));
    }

    fn group(&self, name: &str) {
        self.emit(format_command("group", None, name));
    }

    fn group_end(&self) {
        self.emit("::endgroup::".to_string());
    }

    fn summary(&self, markdown: &str) -> OutputResult<()> {
        let Some(path) = &self.summary_path else {
            tracing::debug!("{} is not set, skipping job summary", STEP_SUMMARY_ENV);
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", markdown)?;

        Ok(())
    }
}
