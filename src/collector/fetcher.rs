//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the collector, including:
//! - Building HTTP clients with proper user agent strings
//! - Posting the station credentials to the played-songs endpoint
//! - Classifying transport and status failures per station

use crate::config::UserAgentConfig;
use crate::station::Station;
use crate::{CollectorError, ConfigError};
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use radio_music_collector::config::UserAgentConfig;
/// use radio_music_collector::collector::build_http_client;
///
/// let config = UserAgentConfig {
///     name: "radio-music-collector".to_string(),
///     version: "0.1.0".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: Name/Version
    let user_agent = format!("{}/{}", config.name, config.version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the played-songs body a station reports for one day
///
/// The body is returned as text without validation; a successful return only
/// means the server answered with a 2xx status.
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Station domain is not a valid URL | `Config` |
/// | Connection, timeout or body read failure | `Http` |
/// | Non-2xx response | `Status` |
pub async fn fetch_station(
    client: &Client,
    station: &Station,
    date: NaiveDate,
) -> Result<String, CollectorError> {
    let url = station.endpoint().map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid domain for {}: {}", station.name, e))
    })?;

    tracing::debug!("Requesting played songs for {} from {}", station.name, url);

    let response = client
        .post(url)
        .form(&station.form_fields(date))
        .send()
        .await
        .map_err(|source| CollectorError::Http {
            station: station.name.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CollectorError::Status {
            station: station.name.clone(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| CollectorError::Http {
        station: station.name.clone(),
        source,
    })
}
