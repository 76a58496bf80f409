//! Application assembly
//!
//! Builds the store and the sync reconciler once at startup and owns
//! their lifecycles. Each public operation corresponds to one
//! presentation event: show next quote, submit new quote, change
//! category filter, export, import, show last viewed. The presentation
//! layer passes values in explicitly; nothing here reads UI state.

use crate::storage::settings::{load_settings, AppSettings};
use crate::store::{QuoteStore, StoreError};
use crate::sync::{RemoteClient, SyncEvent, SyncHandle, SyncReconciler};
use crate::types::Quote;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Application errors surfaced by the assembly layer
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Sync(#[from] crate::sync::SyncError),
}

/// The assembled application
pub struct App {
    settings: AppSettings,
    store: Arc<Mutex<QuoteStore>>,
    sync_handle: Option<SyncHandle>,
}

impl App {
    /// Build the application from validated settings
    ///
    /// Loads (or seeds) the store from the configured data directory.
    /// Sync does not start until `start_sync` is called.
    pub fn new(mut settings: AppSettings) -> Result<Self, AppError> {
        settings.validate();

        let data_dir = settings.resolve_data_dir().map_err(StoreError::from)?;
        let store = QuoteStore::load(&data_dir)?;
        tracing::info!("Loaded {} quotes from {:?}", store.len(), data_dir);

        Ok(Self {
            settings,
            store: Arc::new(Mutex::new(store)),
            sync_handle: None,
        })
    }

    /// Build the application from persisted settings
    ///
    /// Reads `settings.json` from the platform data directory, falling
    /// back to defaults when it is missing or corrupted.
    pub fn from_saved_settings() -> Result<Self, AppError> {
        Self::new(load_settings())
    }

    /// Shared handle to the store, for the sync layer and tests
    pub fn store(&self) -> Arc<Mutex<QuoteStore>> {
        self.store.clone()
    }

    /// Start the periodic sync task
    ///
    /// Returns the event channel carrying cycle outcomes and conflict
    /// notifications. Starting while already running restarts the task.
    pub fn start_sync(&mut self) -> Result<mpsc::UnboundedReceiver<SyncEvent>, AppError> {
        self.stop_sync();

        let client = RemoteClient::new(
            &self.settings.sync_url,
            self.settings.snapshot_limit,
            Duration::from_secs(self.settings.request_timeout_secs),
        )?;
        let reconciler = SyncReconciler::new(
            self.store.clone(),
            client,
            Duration::from_secs(self.settings.sync_interval_secs),
        );

        let (handle, events) = reconciler.spawn();
        self.sync_handle = Some(handle);
        tracing::info!(
            "Sync started: every {}s against {}",
            self.settings.sync_interval_secs,
            self.settings.sync_url
        );
        Ok(events)
    }

    /// Stop the periodic sync task, if running
    pub fn stop_sync(&mut self) {
        if let Some(handle) = self.sync_handle.take() {
            handle.stop();
            tracing::info!("Sync stopped");
        }
    }

    /// "Show next quote": a uniformly random quote, if any
    pub async fn next_quote(&self) -> Option<Quote> {
        self.store.lock().await.random_quote()
    }

    /// "Show last viewed": the quote last served this session
    pub async fn last_viewed(&self) -> Option<Quote> {
        self.store.lock().await.last_viewed()
    }

    /// "Submit new quote"
    pub async fn add_quote(&self, text: &str, category: &str) -> Result<Quote, AppError> {
        Ok(self.store.lock().await.add_quote(text, category)?)
    }

    /// "Change category filter"
    pub async fn set_filter(&self, selector: &str) -> Result<(), AppError> {
        Ok(self.store.lock().await.set_selected_filter(selector)?)
    }

    /// Quotes matching the active filter, for display
    pub async fn filtered_quotes(&self) -> Vec<Quote> {
        self.store.lock().await.filtered_quotes()
    }

    /// Distinct categories, for the filter dropdown
    pub async fn categories(&self) -> Vec<String> {
        self.store.lock().await.categories()
    }

    /// "Export": write the collection to a JSON file
    pub async fn export_to_file(&self, path: &Path) -> Result<(), AppError> {
        Ok(self.store.lock().await.export_to_file(path)?)
    }

    /// "Import": read a JSON file and append its quotes
    pub async fn import_from_file(&self, path: &Path) -> Result<usize, AppError> {
        Ok(self.store.lock().await.import_from_file(path)?)
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop_sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings {
            data_dir: Some(dir.path().to_path_buf()),
            ..AppSettings::default()
        };
        let app = App::new(settings).unwrap();
        (dir, app)
    }

    #[tokio::test]
    async fn test_app_serves_seeded_quotes() {
        let (_dir, app) = temp_app();
        assert_eq!(app.categories().await.len(), 3);
        assert!(app.next_quote().await.is_some());
        assert!(app.last_viewed().await.is_some());
    }

    #[tokio::test]
    async fn test_app_add_and_filter() {
        let (_dir, app) = temp_app();
        app.add_quote("stay curious", "Life").await.unwrap();
        app.set_filter("Life").await.unwrap();

        let filtered = app.filtered_quotes().await;
        assert!(filtered.iter().all(|q| q.category == "Life"));
        assert!(filtered.iter().any(|q| q.text == "stay curious"));
    }

    #[tokio::test]
    async fn test_app_rejects_blank_submission() {
        let (_dir, app) = temp_app();
        let result = app.add_quote("   ", "Life").await;
        assert!(matches!(result, Err(AppError::Store(StoreError::Validation))));
    }

    #[tokio::test]
    async fn test_app_export_import_cycle() {
        let (dir, app) = temp_app();
        let path = dir.path().join("export.json");

        app.export_to_file(&path).await.unwrap();
        let imported = app.import_from_file(&path).await.unwrap();
        assert_eq!(imported, 3);
    }
}
