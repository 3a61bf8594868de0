use crate::config::types::{CollectorConfig, Config, UserAgentConfig};
use crate::station::{Station, ALL_STATIONS};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Lowest accepted pause between station requests (milliseconds)
pub const MIN_FETCH_DELAY_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_collector_config(&config.collector)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_stations(&config.stations)?;
    Ok(())
}

/// Validates collector configuration
fn validate_collector_config(config: &CollectorConfig) -> Result<(), ConfigError> {
    if config.fetch_delay_ms < MIN_FETCH_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "fetch_delay_ms must be >= {}ms, got {}ms",
            MIN_FETCH_DELAY_MS, config.fetch_delay_ms
        )));
    }

    if config.data_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user agent name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.name
        )));
    }

    Ok(())
}

/// Validates station entries
fn validate_stations(stations: &[Station]) -> Result<(), ConfigError> {
    if stations.is_empty() {
        return Err(ConfigError::Validation(
            "at least one station must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for station in stations {
        validate_station_name(&station.name)?;

        if !seen.insert(station.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "station '{}' is configured more than once",
                station.name
            )));
        }

        validate_station_domain(station)?;

        if station.hash.is_some() && station.rs_id.is_none() {
            return Err(ConfigError::Validation(format!(
                "station '{}' has a hash but no rs-id",
                station.name
            )));
        }
    }

    Ok(())
}

/// Validates a station name, which doubles as a directory name
fn validate_station_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "station name cannot be empty".to_string(),
        ));
    }

    if name == ALL_STATIONS {
        return Err(ConfigError::Validation(format!(
            "'{}' is reserved and cannot be used as a station name",
            ALL_STATIONS
        )));
    }

    if name.contains(|c: char| c == '/' || c == '\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "station name '{}' cannot contain path separators",
            name
        )));
    }

    Ok(())
}

/// Validates the station's base URL
fn validate_station_domain(station: &Station) -> Result<(), ConfigError> {
    let url = Url::parse(&station.domain).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid domain '{}' for station '{}': {}",
            station.domain, station.name, e
        ))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "domain '{}' for station '{}' must use HTTP or HTTPS",
            station.domain, station.name
        )));
    }

    if !url.path().ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "domain '{}' for station '{}' must end with '/'",
            station.domain, station.name
        )));
    }

    Ok(())
}
