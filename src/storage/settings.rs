//! Settings storage
//!
//! Manages persistence of application settings: remote sync endpoint,
//! sync cadence, and the data directory override.

use crate::storage::{get_data_dir, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Remote endpoint used for sync (GET snapshot / POST merged collection)
    #[serde(default = "default_sync_url")]
    pub sync_url: String,
    /// Seconds between sync cycles
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,
    /// Maximum number of items taken from a remote snapshot
    #[serde(default = "default_snapshot_limit")]
    pub snapshot_limit: usize,
    /// HTTP timeout applied to sync requests, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Override for the data directory (None = platform default)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_sync_url() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

fn default_sync_interval() -> u64 {
    30
}

fn default_snapshot_limit() -> usize {
    5
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            sync_url: default_sync_url(),
            sync_interval_secs: default_sync_interval(),
            snapshot_limit: default_snapshot_limit(),
            request_timeout_secs: default_request_timeout(),
            data_dir: None,
        }
    }
}

impl AppSettings {
    /// Validate settings values
    ///
    /// Ensures all parameters are within acceptable ranges.
    pub fn validate(&mut self) {
        if self.sync_url.trim().is_empty() {
            self.sync_url = default_sync_url();
        }

        self.sync_interval_secs = self.sync_interval_secs.clamp(5, 3600);
        self.snapshot_limit = self.snapshot_limit.clamp(1, 100);
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 300);
    }

    /// Resolve the effective data directory
    pub fn resolve_data_dir(&self) -> Result<PathBuf, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_data_dir(),
        }
    }
}

/// Settings file path within a data directory
fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

/// Load settings from a specific data directory
///
/// Returns default settings if the file doesn't exist or is corrupted
pub fn load_settings_from(data_dir: &Path) -> AppSettings {
    match load_settings_internal(data_dir) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            AppSettings::default()
        }
    }
}

/// Load settings from the platform data directory
///
/// Returns default settings if the directory cannot be resolved, the
/// file doesn't exist, or it is corrupted
pub fn load_settings() -> AppSettings {
    match get_data_dir() {
        Ok(dir) => load_settings_from(&dir),
        Err(e) => {
            tracing::warn!("Failed to resolve data directory, using defaults: {}", e);
            AppSettings::default()
        }
    }
}

/// Internal settings loading with error propagation
fn load_settings_internal(data_dir: &Path) -> Result<AppSettings, StorageError> {
    let path = settings_path(data_dir);

    if !path.exists() {
        tracing::info!("Settings file not found, using defaults");
        return Ok(AppSettings::default());
    }

    let json = fs::read_to_string(&path)?;
    let mut settings: AppSettings = serde_json::from_str(&json)?;

    settings.validate();

    tracing::debug!("Loaded settings from disk");
    Ok(settings)
}

/// Save settings under a specific data directory
pub fn save_settings_to(data_dir: &Path, settings: &AppSettings) -> Result<(), StorageError> {
    let path = settings_path(data_dir);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;

    tracing::debug!("Saved settings to disk");
    Ok(())
}

/// Save settings to the platform data directory
pub fn save_settings(settings: &AppSettings) -> Result<(), StorageError> {
    save_settings_to(&get_data_dir()?, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.sync_interval_secs, 30);
        assert_eq!(settings.snapshot_limit, 5);
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = AppSettings::default();

        settings.sync_interval_secs = 1;
        settings.validate();
        assert_eq!(settings.sync_interval_secs, 5);

        settings.sync_interval_secs = 100_000;
        settings.validate();
        assert_eq!(settings.sync_interval_secs, 3600);

        settings.snapshot_limit = 0;
        settings.validate();
        assert_eq!(settings.snapshot_limit, 1);

        settings.sync_url = "   ".to_string();
        settings.validate();
        assert!(!settings.sync_url.trim().is_empty());
    }

    #[test]
    fn test_settings_serialization() {
        let settings = AppSettings::default();

        let json = serde_json::to_string(&settings).unwrap();
        let deserialized: AppSettings = serde_json::from_str(&json).unwrap();

        assert_eq!(settings.sync_url, deserialized.sync_url);
        assert_eq!(settings.sync_interval_secs, deserialized.sync_interval_secs);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"sync_interval_secs": 60}"#).unwrap();
        assert_eq!(settings.sync_interval_secs, 60);
        assert_eq!(settings.snapshot_limit, 5);
        assert!(!settings.sync_url.is_empty());
    }

    #[test]
    fn test_missing_settings_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path());
        assert_eq!(settings.sync_interval_secs, 30);
        assert_eq!(settings.snapshot_limit, 5);
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(settings_path(dir.path()), "{not valid json").unwrap();

        let settings = load_settings_from(dir.path());
        assert_eq!(settings.sync_url, default_sync_url());
        assert_eq!(settings.sync_interval_secs, 30);
    }

    #[test]
    fn test_save_then_load_from_dir_roundtrip() {
        let dir = tempfile::tempdir().unwrap();

        let mut settings = AppSettings::default();
        settings.sync_interval_secs = 120;
        settings.sync_url = "https://example.test/quotes".to_string();
        save_settings_to(dir.path(), &settings).unwrap();

        let loaded = load_settings_from(dir.path());
        assert_eq!(loaded.sync_interval_secs, 120);
        assert_eq!(loaded.sync_url, "https://example.test/quotes");
    }

    #[test]
    fn test_loaded_settings_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            settings_path(dir.path()),
            r#"{"sync_interval_secs": 1, "snapshot_limit": 0}"#,
        )
        .unwrap();

        let loaded = load_settings_from(dir.path());
        assert_eq!(loaded.sync_interval_secs, 5);
        assert_eq!(loaded.snapshot_limit, 1);
    }
}
