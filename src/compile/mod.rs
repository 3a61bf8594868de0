//! Compile command
//!
//! Concatenates the stored days of a station over one or more date ranges,
//! then filters, orders, deduplicates, reverses and truncates the result before
//! writing it next to the station's day directories.

mod render;
mod transform;

pub use render::{render_day_list, render_songs};
pub use transform::{apply_transforms, frequency_map, sort_by_frequency, unique, MostPlayed};

use crate::date_range::DateRangeSet;
use crate::output::{format_compile_summary, Reporter};
use crate::song::{parse_played_songs, PlayedSong};
use crate::station::Station;
use crate::storage::Storage;
use crate::{CollectorError, Result};
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Order of the compiled list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SongOrder {
    /// Order the songs were played in
    #[default]
    Chronological,

    /// Most played first
    Frequency,
}

impl FromStr for SongOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chronological" => Ok(Self::Chronological),
            "frequency" => Ok(Self::Frequency),
            other => Err(format!(
                "unknown order '{}', expected chronological or frequency",
                other
            )),
        }
    }
}

impl fmt::Display for SongOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chronological => write!(f, "chronological"),
            Self::Frequency => write!(f, "frequency"),
        }
    }
}

/// Format of the compiled file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl OutputFormat {
    /// File extension used for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(format!(
                "chosen output format '{}' doesn't exist, expected json or text",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Options for one compile run
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub order: SongOrder,
    pub format: OutputFormat,

    /// Keep only the first occurrence of each song
    pub unique: bool,

    /// Reverse the final order
    pub reverse: bool,

    /// Maximum number of songs written
    pub limit: Option<usize>,

    /// Fail instead of skipping days without valid data
    pub require_all_days: bool,

    /// Keep each day in stored order instead of oldest first
    pub keep_day_order: bool,
}

/// Result of compiling one station
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub station: String,
    pub days_loaded: usize,
    pub days_skipped: usize,
    pub songs_read: usize,
    pub songs_written: usize,
    pub path: PathBuf,
    pub most_played: Option<MostPlayed>,
}

/// Songs loaded for one station
#[derive(Debug, Default)]
pub struct LoadedSongs {
    pub songs: Vec<PlayedSong>,
    pub days_loaded: usize,
    pub days_skipped: usize,
}

/// Loads and concatenates the stored days of a station
///
/// Days are visited range by range. A day that is missing or holds an invalid
/// payload is skipped with a warning, or fails the load when
/// `require_all_days` is set.
pub fn load_station_songs(
    storage: &dyn Storage,
    station: &Station,
    dates: &DateRangeSet,
    options: &CompileOptions,
    reporter: &dyn Reporter,
) -> Result<LoadedSongs> {
    let mut loaded = LoadedSongs::default();

    for range in &dates.ranges {
        for day in range.days() {
            reporter.info(&format!("loading {}", day.format("%Y/%m/%d")));

            match load_day(storage, station, day) {
                Ok(mut songs) => {
                    if !options.keep_day_order {
                        songs.reverse();
                    }
                    loaded.songs.extend(songs);
                    loaded.days_loaded += 1;
                }
                Err(reason) => {
                    if options.require_all_days {
                        return Err(CollectorError::MissingDay {
                            station: station.name.clone(),
                            date: day,
                            reason,
                        });
                    }
                    reporter.warn(
                        &format!("Missing data for {}", station.name),
                        &format!("for {} on {} {}", station.name, day, reason),
                    );
                    loaded.days_skipped += 1;
                }
            }
        }
    }

    Ok(loaded)
}

fn load_day(
    storage: &dyn Storage,
    station: &Station,
    day: NaiveDate,
) -> std::result::Result<Vec<PlayedSong>, String> {
    let body = storage
        .read_raw(&station.name, day)
        .map_err(|e| e.to_string())?;
    parse_played_songs(&body).map_err(|e| e.to_string())
}

/// Compiles and writes the list of one station
pub fn compile_station(
    storage: &dyn Storage,
    station: &Station,
    dates: &DateRangeSet,
    options: &CompileOptions,
    reporter: &dyn Reporter,
) -> Result<CompileReport> {
    reporter.group(&format!("compiling for {}", station.name));

    let result = compile_station_inner(storage, station, dates, options, reporter);

    reporter.group_end();
    result
}

fn compile_station_inner(
    storage: &dyn Storage,
    station: &Station,
    dates: &DateRangeSet,
    options: &CompileOptions,
    reporter: &dyn Reporter,
) -> Result<CompileReport> {
    let loaded = load_station_songs(storage, station, dates, options, reporter)?;
    let songs_read = loaded.songs.len();

    let (songs, most_played) = apply_transforms(loaded.songs, options);

    if let Some(top) = &most_played {
        reporter.info(&format!(
            "highest frequency song {} by {} played {} times",
            top.track, top.artist, top.plays
        ));
    }

    let body = render_songs(&songs, options.format).map_err(crate::output::OutputError::from)?;
    let path = storage.write_compiled(
        &station.name,
        &dates.raw,
        options.format.extension(),
        &body,
    )?;

    reporter.info(&format!(
        "Output is {} songs long for {}",
        songs.len(),
        station.name
    ));

    Ok(CompileReport {
        station: station.name.clone(),
        days_loaded: loaded.days_loaded,
        days_skipped: loaded.days_skipped,
        songs_read,
        songs_written: songs.len(),
        path,
        most_played,
    })
}

/// Runs the compile command for the selected stations
///
/// Stations are compiled one after another; the first fatal error stops the
/// run.
pub fn run_compile(
    storage: &dyn Storage,
    stations: &[&Station],
    dates: &DateRangeSet,
    options: &CompileOptions,
    reporter: &dyn Reporter,
) -> Result<Vec<CompileReport>> {
    if stations.is_empty() {
        return Err(CollectorError::NoStations);
    }

    tracing::debug!(
        "Compiling {} stations over {} ranges from '{}'",
        stations.len(),
        dates.ranges.len(),
        dates.raw
    );

    let mut reports = Vec::with_capacity(stations.len());
    for station in stations {
        match compile_station(storage, station, dates, options, reporter) {
            Ok(report) => reports.push(report),
            Err(e) => {
                reporter.error(&format!("Compile for {} failed", station.name), &e.to_string());
                return Err(e);
            }
        }
    }

    reporter.summary(&format_compile_summary(&dates.raw, &reports))?;

    Ok(reports)
}
