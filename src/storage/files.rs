use crate::storage::traits::{Storage, StorageError, StorageResult};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the raw response stored per station and day
pub const RAW_FILE: &str = "raw.json";

/// File name of the derived song list stored per station and day
pub const LIST_FILE: &str = "list.txt";

/// Archive stored as a directory tree: `<root>/<station>/<yyyy>/<mm>/<dd>/`
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding a station's files for one day
    pub fn day_dir(&self, station: &str, date: NaiveDate) -> PathBuf {
        self.root
            .join(station)
            .join(date.format("%Y").to_string())
            .join(date.format("%m").to_string())
            .join(date.format("%d").to_string())
    }

    /// Path of the raw response for a station and day
    pub fn raw_path(&self, station: &str, date: NaiveDate) -> PathBuf {
        self.day_dir(station, date).join(RAW_FILE)
    }

    fn write(&self, path: &Path, body: &str) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, body).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(())
    }
}

/// Turns a free-text name into a single path component
///
/// Path separators become `-` so a date expression such as `2023/05` names a
/// file instead of a subdirectory.
pub fn sanitize_file_name(name: &str) -> StorageResult<String> {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return Err(StorageError::InvalidName(name.to_string()));
    }

    Ok(cleaned)
}

impl Storage for FileStorage {
    fn write_raw(&self, station: &str, date: NaiveDate, body: &str) -> StorageResult<PathBuf> {
        let path = self.raw_path(station, date);
        self.write(&path, body)?;
        Ok(path)
    }

    fn read_raw(&self, station: &str, date: NaiveDate) -> StorageResult<String> {
        let path = self.raw_path(station, date);

        fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(path.clone())
            } else {
                StorageError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })
    }

    fn has_raw(&self, station: &str, date: NaiveDate) -> bool {
        self.raw_path(station, date).is_file()
    }

    fn write_list(&self, station: &str, date: NaiveDate, list: &str) -> StorageResult<PathBuf> {
        let path = self.day_dir(station, date).join(LIST_FILE);
        self.write(&path, list)?;
        Ok(path)
    }

    fn write_compiled(
        &self,
        station: &str,
        name: &str,
        extension: &str,
        body: &str,
    ) -> StorageResult<PathBuf> {
        let file_name = format!("{}.{}", sanitize_file_name(name)?, extension);
        let path = self.root.join(station).join(file_name);
        self.write(&path, body)?;
        Ok(path)
    }
}
