//! Storage module for the played-songs archive
//!
//! This module handles all file operations for the collector, including:
//! - Laying out raw responses per station and calendar day
//! - Reading stored days back for compilation
//! - Writing derived lists and compiled outputs

mod files;
mod traits;

pub use files::{sanitize_file_name, FileStorage, LIST_FILE, RAW_FILE};
pub use traits::{Storage, StorageError, StorageResult};

use std::path::Path;

/// Opens the archive rooted at the given data directory
///
/// The directory does not need to exist yet; it is created on first write.
pub fn open_storage(path: &Path) -> FileStorage {
    FileStorage::new(path)
}
