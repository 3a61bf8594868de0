//! Collector module for polling stations
//!
//! This module contains the fetching side of the collector, including:
//! - A throttled FIFO runner pacing requests to the station sites
//! - HTTP requests for a station's played songs
//! - The `get` command storing each station's day

mod fetcher;
mod get;
mod runner;

pub use fetcher::{build_http_client, fetch_station};
pub use get::{
    run_get, store_station_response, FetchReport, GetOptions, StationOutcome, StationStatus,
};
pub use runner::{ThrottledTaskRunner, DEFAULT_TASK_DELAY};
