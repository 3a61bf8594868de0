use crate::config::types::Config;
use crate::config::validation::validate;
use crate::station::default_stations;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses configuration from TOML text
///
/// Missing sections take their defaults and an empty station list is replaced
/// by the built-in stations before validation.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;

    if config.stations.is_empty() {
        config.stations = default_stations();
    }

    validate(&config)?;

    Ok(config)
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use radio_music_collector::config::load_config;
///
/// let config = load_config(Path::new("collector.toml")).unwrap();
/// println!("Fetch delay: {}ms", config.collector.fetch_delay_ms);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged on startup so runs can be matched to the configuration they used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
