//! List transforms applied to a station's concatenated songs

use crate::compile::{CompileOptions, SongOrder};
use crate::song::PlayedSong;
use std::collections::{HashMap, HashSet};

/// The song heading a frequency-ordered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MostPlayed {
    pub track: String,
    pub artist: String,
    pub plays: usize,
}

/// Counts plays per song id
pub fn frequency_map(songs: &[PlayedSong]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for song in songs {
        *counts.entry(song.id()).or_insert(0) += 1;
    }
    counts
}

/// Sorts by descending play count, keeping the existing order between ties
pub fn sort_by_frequency(songs: &mut [PlayedSong], counts: &HashMap<String, usize>) {
    let plays = |song: &PlayedSong| counts.get(&song.id()).copied().unwrap_or(0);
    songs.sort_by(|a, b| plays(b).cmp(&plays(a)));
}

/// Keeps the first occurrence of every song id
pub fn unique(songs: Vec<PlayedSong>) -> Vec<PlayedSong> {
    let mut seen = HashSet::new();
    songs
        .into_iter()
        .filter(|song| seen.insert(song.id()))
        .collect()
}

/// Applies the compile transforms in their fixed order
///
/// Entries without a track title are dropped, then the list is ordered,
/// deduplicated, reversed and truncated as the options ask.
///
/// # Returns
///
/// The transformed list, and the most-played song when ordering by frequency
/// and the list is not empty
pub fn apply_transforms(
    songs: Vec<PlayedSong>,
    options: &CompileOptions,
) -> (Vec<PlayedSong>, Option<MostPlayed>) {
    let mut songs: Vec<PlayedSong> = songs
        .into_iter()
        .filter(|song| !song.track.is_empty())
        .collect();

    let mut most_played = None;

    if options.order == SongOrder::Frequency {
        let counts = frequency_map(&songs);
        sort_by_frequency(&mut songs, &counts);

        most_played = songs.first().map(|song| MostPlayed {
            track: song.track.clone(),
            artist: song.artist.clone(),
            plays: counts.get(&song.id()).copied().unwrap_or(0),
        });
    }

    if options.unique {
        songs = unique(songs);
    }

    if options.reverse {
        songs.reverse();
    }

    if let Some(limit) = options.limit {
        songs.truncate(limit);
    }

    (songs, most_played)
}
