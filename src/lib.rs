//! Radio Music Collector: polls radio stations for their played songs
//!
//! This crate fetches "recently played" lists from a set of radio station
//! endpoints, stores the raw responses in a per-station, per-day file tree and
//! compiles the stored days into ordered or deduplicated song lists.

pub mod collector;
pub mod compile;
pub mod config;
pub mod date_range;
pub mod output;
pub mod song;
pub mod station;
pub mod storage;

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for collector operations
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Date error: {0}")]
    Date(#[from] date_range::DateError),

    #[error("Request for {station} failed: {source}")]
    Http {
        station: String,
        source: reqwest::Error,
    },

    #[error("Request for {station} returned HTTP {status}")]
    Status { station: String, status: u16 },

    #[error("Invalid played songs for {station}: {source}")]
    Payload {
        station: String,
        source: song::PayloadError,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Selected station {0} could not be found")]
    UnknownStation(String),

    #[error("No stations specified")]
    NoStations,

    #[error("No data for {station} on {date}: {reason}")]
    MissingDay {
        station: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("{failed} of {total} stations failed")]
    FetchFailures { failed: usize, total: usize },

    #[error("Task runner is no longer accepting tasks")]
    RunnerClosed,

    #[error("Task panicked before producing a result")]
    TaskPanicked,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for collector operations
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use date_range::{resolve_date_ranges, DatePrecision, DateRange, DateRangeSet};
pub use song::{parse_played_songs, song_id, PlayedSong};
pub use station::Station;
