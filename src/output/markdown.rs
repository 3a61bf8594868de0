//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of fetch and
//! compile runs, published as CI step summaries.

use crate::collector::{FetchReport, StationStatus};
use crate::compile::CompileReport;

/// Formats the results of a fetch run as markdown
///
/// # Arguments
///
/// * `report` - The per-station outcomes of the run
///
/// # Returns
///
/// A formatted markdown string
pub fn format_fetch_summary(report: &FetchReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("## Played songs for {}\n\n", report.date));

    md.push_str("| Station | Result | Songs |\n");
    md.push_str("|---------|--------|-------|\n");
    for outcome in &report.outcomes {
        match &outcome.status {
            StationStatus::Saved { songs, .. } => {
                md.push_str(&format!("| {} | saved | {} |\n", outcome.station, songs));
            }
            StationStatus::Failed { reason } => {
                md.push_str(&format!(
                    "| {} | failed: {} | - |\n",
                    outcome.station,
                    escape_cell(reason)
                ));
            }
        }
    }
    md.push('\n');

    md.push_str(&format!(
        "- **Saved**: {} of {}\n",
        report.succeeded(),
        report.total()
    ));
    md.push_str(&format!("- **Failed**: {}\n", report.failed()));

    md
}

/// Formats the results of a compile run as markdown
pub fn format_compile_summary(dates: &str, reports: &[CompileReport]) -> String {
    let mut md = String::new();

    md.push_str(&format!("## Compiled lists for {}\n\n", escape_cell(dates)));

    md.push_str("| Station | Days | Skipped | Songs | Most played |\n");
    md.push_str("|---------|------|---------|-------|-------------|\n");
    for report in reports {
        let most_played = report
            .most_played
            .as_ref()
            .map(|top| {
                escape_cell(&format!(
                    "{} by {} ({}x)",
                    top.track, top.artist, top.plays
                ))
            })
            .unwrap_or_else(|| "-".to_string());

        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            report.station,
            report.days_loaded,
            report.days_skipped,
            report.songs_written,
            most_played
        ));
    }
    md.push('\n');

    let total_songs: usize = reports.iter().map(|r| r.songs_written).sum();
    md.push_str(&format!("- **Stations**: {}\n", reports.len()));
    md.push_str(&format!("- **Songs written**: {}\n", total_songs));

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
