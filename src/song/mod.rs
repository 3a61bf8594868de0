//! Played song records and payload validation
//!
//! Station endpoints answer with a JSON array of objects carrying at least
//! `rs_track` and `rs_artist`. Any other fields are kept verbatim so compiled
//! JSON output reproduces what was stored.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reasons a played-songs payload is rejected
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("played song body is empty")]
    EmptyBody,

    #[error("failed to parse body to json; {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("body is not an array like expected")]
    NotAnArray,

    #[error("item {index} does not have the required structure")]
    MissingFields { index: usize },

    #[error("body is empty list")]
    EmptyList,
}

/// A song reported as played by a station
///
/// `track` and `artist` are read out of the stored record; the record itself is
/// kept untouched and is what gets serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedSong {
    pub track: String,
    pub artist: String,
    record: Map<String, Value>,
}

impl PlayedSong {
    pub fn new(track: impl Into<String>, artist: impl Into<String>) -> Self {
        let track = track.into();
        let artist = artist.into();

        let mut record = Map::new();
        record.insert("rs_track".to_string(), Value::from(track.as_str()));
        record.insert("rs_artist".to_string(), Value::from(artist.as_str()));

        Self {
            track,
            artist,
            record,
        }
    }

    /// Wraps a stored object, `None` unless it has string `rs_track` and `rs_artist`
    pub fn from_record(record: Map<String, Value>) -> Option<Self> {
        let track = record.get("rs_track")?.as_str()?.to_string();
        let artist = record.get("rs_artist")?.as_str()?.to_string();

        Some(Self {
            track,
            artist,
            record,
        })
    }

    /// The stored object, fields in their original order
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Sets a field of the record other than the track or artist
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if key != "rs_track" && key != "rs_artist" {
            self.record.insert(key, value.into());
        }
    }

    /// Identity used for deduplication and frequency counting
    pub fn id(&self) -> String {
        song_id(self)
    }

    /// Renders the song as an `Artist - Track` line
    ///
    /// Hyphens are removed from both fields so the separator stays unambiguous.
    pub fn to_line(&self) -> String {
        format!(
            "{} - {}",
            self.artist.replace('-', ""),
            self.track.replace('-', "")
        )
    }
}

impl Serialize for PlayedSong {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

/// Returns the identity of a song: its track title followed by its artist
pub fn song_id(song: &PlayedSong) -> String {
    format!("{}{}", song.track, song.artist)
}

fn has_played_song_data(item: &Value) -> bool {
    matches!(item.get("rs_track"), Some(Value::String(_)))
        && matches!(item.get("rs_artist"), Some(Value::String(_)))
}

/// Parses and validates a played-songs response body
///
/// # Returns
///
/// * `Ok(Vec<PlayedSong>)` - A non-empty list of songs, in payload order
/// * `Err(PayloadError)` - The body is empty, not JSON, not an array of song
///   records, or an empty array
pub fn parse_played_songs(body: &str) -> Result<Vec<PlayedSong>, PayloadError> {
    if body.is_empty() {
        return Err(PayloadError::EmptyBody);
    }

    let json: Value = serde_json::from_str(body)?;

    let items = match json {
        Value::Array(items) => items,
        _ => return Err(PayloadError::NotAnArray),
    };

    if let Some(index) = items.iter().position(|item| !has_played_song_data(item)) {
        return Err(PayloadError::MissingFields { index });
    }

    if items.is_empty() {
        return Err(PayloadError::EmptyList);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let record = match item {
                Value::Object(record) => Some(record),
                _ => None,
            };
            record
                .and_then(PlayedSong::from_record)
                .ok_or(PayloadError::MissingFields { index })
        })
        .collect()
}
