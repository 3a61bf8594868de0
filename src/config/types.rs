use crate::station::{default_stations, Station};
use serde::Deserialize;

/// Default pause between station requests (milliseconds)
pub const DEFAULT_FETCH_DELAY_MS: u64 = 2358;

/// Default root of the data tree
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Main configuration structure for the collector
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub collector: CollectorConfig,

    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,

    /// Configured stations; an empty list means the built-in stations
    #[serde(default, rename = "station")]
    pub stations: Vec<Station>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collector: CollectorConfig::default(),
            user_agent: UserAgentConfig::default(),
            stations: default_stations(),
        }
    }
}

/// Collector behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// Root directory of the per-station data tree
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,

    /// Pause between consecutive station requests (milliseconds)
    #[serde(rename = "fetch-delay-ms", default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,

    /// Fail the fetch command if any station fails
    #[serde(rename = "require-all", default)]
    pub require_all: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            fetch_delay_ms: default_fetch_delay_ms(),
            require_all: false,
        }
    }
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

fn default_fetch_delay_ms() -> u64 {
    DEFAULT_FETCH_DELAY_MS
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name sent in the User-Agent header
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Version sent in the User-Agent header
    #[serde(default = "default_agent_version")]
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

fn default_agent_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
