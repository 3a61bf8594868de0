//! Reporter trait and output error types
//!
//! Commands report progress through a [`Reporter`] so the same run can log to
//! the console or emit CI annotations.

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for progress reporters
///
/// Titles are short labels shown by reporters that support them; console
/// output only prints the message.
pub trait Reporter {
    /// Records a progress message
    fn info(&self, message: &str);

    /// Records a noteworthy event
    fn notice(&self, title: &str, message: &str);

    /// Records a recoverable failure
    fn warn(&self, title: &str, message: &str);

    /// Records a failure
    fn error(&self, title: &str, message: &str);

    /// Starts a group of related messages
    fn group(&self, name: &str);

    /// Ends the innermost group
    fn group_end(&self);

    /// Publishes a Markdown summary of the run
    fn summary(&self, markdown: &str) -> OutputResult<()>;
}
