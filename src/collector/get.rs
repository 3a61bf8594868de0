//! Fetch command orchestration
//!
//! Polls every selected station for one day through the throttled runner,
//! validates each response and stores the valid ones. A station failing never
//! stops the others; the overall verdict is taken once all were attempted.

use crate::collector::fetcher::{build_http_client, fetch_station};
use crate::collector::runner::ThrottledTaskRunner;
use crate::compile::render_day_list;
use crate::config::Config;
use crate::output::{format_fetch_summary, Reporter};
use crate::song::parse_played_songs;
use crate::station::{fetch_targets, Station};
use crate::storage::Storage;
use crate::{CollectorError, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

/// Options for one fetch run
#[derive(Debug, Clone)]
pub struct GetOptions {
    /// Day to request
    pub date: NaiveDate,

    /// Pause between station requests
    pub fetch_delay: Duration,

    /// Also poll stations marked as not fetchable
    pub include_unfetchable: bool,

    /// Fail the run if any station fails
    pub require_all: bool,

    /// Also write the derived `list.txt`
    pub write_list: bool,
}

impl GetOptions {
    /// Options for `date` taking the remaining values from the configuration
    pub fn from_config(config: &Config, date: NaiveDate) -> Self {
        Self {
            date,
            fetch_delay: Duration::from_millis(config.collector.fetch_delay_ms),
            include_unfetchable: false,
            require_all: config.collector.require_all,
            write_list: false,
        }
    }
}

/// What happened to one station
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationStatus {
    /// The response was valid and stored, `replaced` when the day was already stored
    Saved {
        songs: usize,
        path: PathBuf,
        replaced: bool,
    },

    /// The request or the response was rejected
    Failed { reason: String },
}

/// Result of polling one station
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationOutcome {
    pub station: String,
    pub status: StationStatus,
}

impl StationOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.status, StationStatus::Saved { .. })
    }
}

/// Results of a fetch run, in station order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub date: NaiveDate,
    pub outcomes: Vec<StationOutcome>,
}

impl FetchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Turns the report into the run verdict
    ///
    /// The run fails when every attempted station failed, or when
    /// `require_all` is set and any station failed.
    pub fn verdict(&self, require_all: bool) -> Result<()> {
        let failed = self.failed();
        if failed > 0 && (require_all || failed == self.total()) {
            return Err(CollectorError::FetchFailures {
                failed,
                total: self.total(),
            });
        }
        Ok(())
    }
}

/// Validates a station's response and stores it
///
/// Nothing is written unless the body is a non-empty array of song records.
pub fn store_station_response(
    storage: &dyn Storage,
    station: &Station,
    date: NaiveDate,
    body: &str,
    write_list: bool,
) -> Result<StationStatus> {
    let songs = parse_played_songs(body).map_err(|source| CollectorError::Payload {
        station: station.name.clone(),
        source,
    })?;

    let replaced = storage.has_raw(&station.name, date);
    let path = storage.write_raw(&station.name, date, body)?;

    if write_list {
        storage.write_list(&station.name, date, &render_day_list(&songs))?;
    }

    Ok(StationStatus::Saved {
        songs: songs.len(),
        path,
        replaced,
    })
}

/// Runs the fetch command
///
/// # Arguments
///
/// * `config` - Stations and user agent to use
/// * `storage` - Archive receiving valid responses
/// * `options` - Day and policy for this run
/// * `reporter` - Destination for progress and the results summary
///
/// # Returns
///
/// * `Ok(FetchReport)` - Every station was attempted and the verdict passed
/// * `Err(CollectorError)` - The HTTP client could not be built, or the
///   verdict failed (see [`FetchReport::verdict`])
pub async fn run_get(
    config: &Config,
    storage: &dyn Storage,
    options: &GetOptions,
    reporter: &dyn Reporter,
) -> Result<FetchReport> {
    let client = build_http_client(&config.user_agent)?;
    let runner = ThrottledTaskRunner::new(options.fetch_delay);
    let targets = fetch_targets(&config.stations, options.include_unfetchable);

    let skipped = config.stations.len() - targets.len();
    if skipped > 0 {
        tracing::info!("Skipping {} stations marked as not fetchable", skipped);
    }

    reporter.group(&format!(
        "Fetching {} stations for {}",
        targets.len(),
        options.date
    ));

    // queue everything up front, the runner paces the requests
    let pending: Vec<_> = targets
        .iter()
        .map(|station| {
            let client = client.clone();
            let owned = (*station).clone();
            let date = options.date;
            let request =
                runner.add_task(move || async move { fetch_station(&client, &owned, date).await });
            (*station, request)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(pending.len());

    for (station, request) in pending {
        let stored = request.await.and_then(|body| {
            store_station_response(storage, station, options.date, &body, options.write_list)
        });

        let status = match stored {
            Ok(status) => {
                if let StationStatus::Saved {
                    songs,
                    path,
                    replaced,
                } = &status
                {
                    reporter.info(&format!(
                        "Saved {} songs for {} to {}{}",
                        songs,
                        station.name,
                        path.display(),
                        if *replaced { " (replaced)" } else { "" }
                    ));
                }
                status
            }
            Err(e) => {
                reporter.warn(&format!("Request for {} failed", station.name), &e.to_string());
                StationStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        outcomes.push(StationOutcome {
            station: station.name.clone(),
            status,
        });
    }

    reporter.group_end();

    let report = FetchReport {
        date: options.date,
        outcomes,
    };

    reporter.summary(&format_fetch_summary(&report))?;

    match report.verdict(options.require_all) {
        Ok(()) => {
            reporter.notice(
                "Fetch finished",
                &format!(
                    "{} of {} stations saved for {}",
                    report.succeeded(),
                    report.total(),
                    report.date
                ),
            );
            Ok(report)
        }
        Err(e) => {
            reporter.error("Fetch failed", &e.to_string());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStorage;
    use tempfile::TempDir;

    fn station() -> Station {
        Station {
            name: "Joe".to_string(),
            domain: "https://myonlineradio.nl/".to_string(),
            rid: 60,
            rs_id: None,
            hash: None,
            fetchable: true,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn outcome(name: &str, saved: bool) -> StationOutcome {
        StationOutcome {
            station: name.to_string(),
            status: if saved {
                StationStatus::Saved {
                    songs: 1,
                    path: PathBuf::from("x"),
                    replaced: false,
                }
            } else {
                StationStatus::Failed {
                    reason: "boom".to_string(),
                }
            },
        }
    }

    #[test]
    fn test_store_valid_response() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        let body = r#"[{"rs_track":"Hello","rs_artist":"Adele"}]"#;

        let status = store_station_response(&storage, &station(), date(), body, false).unwrap();
        assert!(matches!(
            status,
            StationStatus::Saved {
                songs: 1,
                replaced: false,
                ..
            }
        ));
        assert_eq!(storage.read_raw("Joe", date()).unwrap(), body);
        assert!(!storage.day_dir("Joe", date()).join("list.txt").exists());
    }

    #[test]
    fn test_store_again_replaces_day() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        let first = r#"[{"rs_track":"Hello","rs_artist":"Adele"}]"#;
        let second = r#"[{"rs_track":"Clocks","rs_artist":"Coldplay"},{"rs_track":"Hello","rs_artist":"Adele"}]"#;

        store_station_response(&storage, &station(), date(), first, false).unwrap();
        let status = store_station_response(&storage, &station(), date(), second, false).unwrap();

        assert!(matches!(
            status,
            StationStatus::Saved {
                songs: 2,
                replaced: true,
                ..
            }
        ));
        assert_eq!(storage.read_raw("Joe", date()).unwrap(), second);
    }

    #[test]
    fn test_store_writes_list() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        let body = r#"[
            {"rs_track":"B","rs_artist":"Two"},
            {"rs_track":"","rs_artist":"Jingle"},
            {"rs_track":"A","rs_artist":"One"},
            {"rs_track":"B","rs_artist":"Two"}
        ]"#;

        store_station_response(&storage, &station(), date(), body, true).unwrap();

        let list =
            std::fs::read_to_string(storage.day_dir("Joe", date()).join("list.txt")).unwrap();
        assert_eq!(list, "Two - B\nOne - A");
    }

    #[test]
    fn test_malformed_response_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        let result = store_station_response(
            &storage,
            &station(),
            date(),
            r#"{"error":"busy"}"#,
            true,
        );

        assert!(matches!(result, Err(CollectorError::Payload { .. })));
        assert!(!storage.has_raw("Joe", date()));
    }

    #[test]
    fn test_verdict() {
        let mixed = FetchReport {
            date: date(),
            outcomes: vec![outcome("a", true), outcome("b", false)],
        };
        assert_eq!(mixed.succeeded(), 1);
        assert_eq!(mixed.failed(), 1);
        assert!(mixed.verdict(false).is_ok());
        assert!(matches!(
            mixed.verdict(true),
            Err(CollectorError::FetchFailures { failed: 1, total: 2 })
        ));

        let all_failed = FetchReport {
            date: date(),
            outcomes: vec![outcome("a", false), outcome("b", false)],
        };
        assert!(all_failed.verdict(false).is_err());

        let empty = FetchReport {
            date: date(),
            outcomes: vec![],
        };
        assert!(empty.verdict(true).is_ok());
    }
}
