//! Rendering compiled song lists

use crate::compile::OutputFormat;
use crate::song::PlayedSong;
use std::collections::HashSet;

/// Renders songs in the requested format
///
/// JSON output is a compact array of the stored objects, text output one
/// `Artist - Track` line per song.
pub fn render_songs(songs: &[PlayedSong], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(songs),
        OutputFormat::Text => Ok(songs
            .iter()
            .map(PlayedSong::to_line)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Renders one stored day as the `list.txt` companion file
///
/// Songs are listed oldest first, entries without a track are left out and
/// repeated lines are kept only once.
pub fn render_day_list(songs: &[PlayedSong]) -> String {
    let mut seen = HashSet::new();

    songs
        .iter()
        .rev()
        .filter(|song| !song.track.is_empty())
        .map(PlayedSong::to_line)
        .filter(|line| seen.insert(line.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}
