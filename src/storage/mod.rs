//! Persistent storage
//!
//! This module handles data persistence for the quote collection, the
//! selected category filter, and application settings. Everything is
//! stored as JSON files under a single data directory.

pub mod settings;

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not determine data directory")]
    DataDir,
}

/// Get the default data directory for the application
///
/// Resolved per-platform via `ProjectDirs`; callers may override it with
/// an explicit path (tests do).
pub fn get_data_dir() -> Result<PathBuf, StorageError> {
    let dirs = ProjectDirs::from("", "", "quotevault").ok_or(StorageError::DataDir)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Read a JSON file into a value
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

/// Write a value as pretty-printed JSON
///
/// Writes to a temp file first and renames it into place so a crash
/// mid-write never leaves a truncated file behind.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;

    tracing::debug!("Wrote {:?}", path);
    Ok(())
}
