//! Storage traits and error types
//!
//! This module defines the trait interface for the played-songs archive and
//! associated error types.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No stored data at {0}")]
    NotFound(PathBuf),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for played-songs archive backends
///
/// Data is addressed by station name and calendar day. Writes replace any
/// existing content for the same key.
pub trait Storage {
    /// Stores a raw played-songs response body unchanged
    ///
    /// # Returns
    ///
    /// The location the body was written to
    fn write_raw(&self, station: &str, date: NaiveDate, body: &str) -> StorageResult<PathBuf>;

    /// Reads the raw body stored for a station and day
    ///
    /// Returns [`StorageError::NotFound`] when nothing was stored.
    fn read_raw(&self, station: &str, date: NaiveDate) -> StorageResult<String>;

    /// Whether a raw body is stored for a station and day
    fn has_raw(&self, station: &str, date: NaiveDate) -> bool;

    /// Stores the derived `Artist - Track` list next to the raw body
    fn write_list(&self, station: &str, date: NaiveDate, list: &str) -> StorageResult<PathBuf>;

    /// Stores a compiled song list for a station
    ///
    /// # Arguments
    ///
    /// * `station` - Station the list was compiled for
    /// * `name` - File stem, usually the raw date expression
    /// * `extension` - File extension without the dot
    /// * `body` - File content
    fn write_compiled(
        &self,
        station: &str,
        name: &str,
        extension: &str,
        body: &str,
    ) -> StorageResult<PathBuf>;
}
