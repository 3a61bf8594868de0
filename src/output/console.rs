use crate::output::traits::{OutputResult, Reporter};

/// Reporter writing through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn notice(&self, _title: &str, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, _title: &str, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, _title: &str, message: &str) {
        tracing::error!("{}", message);
    }

    fn group(&self, name: &str) {
        tracing::info!("== {} ==", name);
    }

    fn group_end(&self) {}

    fn summary(&self, markdown: &str) -> OutputResult<()> {
        tracing::debug!("Run summary:\n{}", markdown);
        Ok(())
    }
}
