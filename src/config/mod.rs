//! Configuration module for the collector
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every section has defaults, so running without a file
//! uses the built-in station list.
//!
//! # Example
//!
//! ```no_run
//! use radio_music_collector::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("collector.toml")).unwrap();
//! println!("Polling {} stations", config.stations.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CollectorConfig, Config, UserAgentConfig, DEFAULT_DATA_DIR, DEFAULT_FETCH_DELAY_MS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
