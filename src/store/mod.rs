//! Quote store
//!
//! Owns the quote collection and its persistence. All mutation of the
//! collection goes through this type; callers get copies on read.

pub mod categories;

use crate::storage::{read_json, write_json, StorageError};
use crate::types::Quote;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name for the persisted collection
const QUOTES_FILE: &str = "quotes.json";
/// File name for the persisted category filter
const FILTER_FILE: &str = "selected_category.json";

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Quote text and category must be non-empty")]
    Validation,
    #[error("Invalid quote JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The quote collection plus its session state
///
/// Durable state (the collection and the selected filter) lives as JSON
/// under `data_dir`. The last-viewed quote is session-scoped: it lives
/// only for the lifetime of this instance and is never written to disk.
#[derive(Debug)]
pub struct QuoteStore {
    data_dir: PathBuf,
    quotes: Vec<Quote>,
    selected_filter: String,
    last_viewed: Option<Quote>,
}

/// The seed collection installed on first run
fn seed_quotes() -> Vec<Quote> {
    [
        (
            "The best way to predict the future is to create it.",
            "Motivation",
        ),
        ("Learning never exhausts the mind.", "Education"),
        (
            "Life is really simple, but we insist on making it complicated.",
            "Life",
        ),
    ]
    .into_iter()
    .filter_map(|(text, category)| Quote::new(text, category))
    .collect()
}

impl QuoteStore {
    /// Load the store from `data_dir`, seeding it on first run
    ///
    /// If no quotes file exists, the seed set is installed and persisted
    /// immediately. Loading an already-loaded directory again just
    /// re-reads state.
    pub fn load(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();

        let quotes = match read_json::<Vec<Quote>>(&data_dir.join(QUOTES_FILE))? {
            Some(quotes) => {
                tracing::debug!("Loaded {} quotes from disk", quotes.len());
                quotes
            }
            None => {
                tracing::info!("No quotes file found, installing seed set");
                let seeded = seed_quotes();
                write_json(&data_dir.join(QUOTES_FILE), &seeded)?;
                seeded
            }
        };

        let selected_filter = read_json::<String>(&data_dir.join(FILTER_FILE))?
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| categories::ALL_CATEGORIES.to_string());

        Ok(Self {
            data_dir,
            quotes,
            selected_filter,
            last_viewed: None,
        })
    }

    /// Copy-on-read access to the collection
    pub fn quotes(&self) -> Vec<Quote> {
        self.quotes.clone()
    }

    /// Number of quotes currently held
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Append a new quote and persist the collection
    ///
    /// Fails with `StoreError::Validation` if either field is empty after
    /// trimming; no state is mutated in that case.
    pub fn add_quote(&mut self, text: &str, category: &str) -> Result<Quote, StoreError> {
        let quote = Quote::new(text, category).ok_or(StoreError::Validation)?;
        self.quotes.push(quote.clone());
        self.persist()?;
        tracing::debug!("Added quote in category '{}'", quote.category);
        Ok(quote)
    }

    /// Pick a quote uniformly at random from the whole collection
    ///
    /// Selection ignores the active category filter. The picked quote is
    /// recorded as the last-viewed quote. Returns `None` on an empty
    /// collection without touching any state.
    pub fn random_quote(&mut self) -> Option<Quote> {
        if self.quotes.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..self.quotes.len());
        let quote = self.quotes[index].clone();
        self.last_viewed = Some(quote.clone());
        Some(quote)
    }

    /// The last quote served by `random_quote` this session, if any
    pub fn last_viewed(&self) -> Option<Quote> {
        self.last_viewed.clone()
    }

    /// Append imported quotes and persist once
    ///
    /// Import policy is append: existing quotes are kept and the imported
    /// ones are added after them. The batch is validated up front; if any
    /// entry has an empty text or category the whole import is rejected
    /// and the collection is left untouched.
    pub fn import_quotes(&mut self, quotes: Vec<Quote>) -> Result<usize, StoreError> {
        let mut incoming = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let mut trimmed = Quote::new(&quote.text, &quote.category).ok_or(StoreError::Validation)?;
            trimmed.id = quote.id;
            incoming.push(trimmed);
        }

        let count = incoming.len();
        self.quotes.extend(incoming);
        self.persist()?;
        tracing::info!("Imported {} quotes", count);
        Ok(count)
    }

    /// Parse a JSON array of quotes and import it
    pub fn import_json(&mut self, json: &str) -> Result<usize, StoreError> {
        let quotes: Vec<Quote> = serde_json::from_str(json).map_err(StoreError::Parse)?;
        self.import_quotes(quotes)
    }

    /// Read a JSON file and import its quotes
    pub fn import_from_file(&mut self, path: &Path) -> Result<usize, StoreError> {
        let json = fs::read_to_string(path)?;
        self.import_json(&json)
    }

    /// Export the full collection as pretty-printed JSON
    pub fn export_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&self.quotes).map_err(StoreError::Parse)
    }

    /// Write the exported collection to a file
    pub fn export_to_file(&self, path: &Path) -> Result<(), StoreError> {
        fs::write(path, self.export_json()?)?;
        tracing::info!("Exported {} quotes to {:?}", self.quotes.len(), path);
        Ok(())
    }

    /// Replace the whole collection and persist
    ///
    /// Used by the sync reconciler to install a merged collection. Every
    /// entry must hold the non-empty invariant or the replacement is
    /// rejected wholesale.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> Result<(), StoreError> {
        if quotes.iter().any(|q| !q.is_valid()) {
            return Err(StoreError::Validation);
        }
        self.quotes = quotes;
        self.persist()?;
        Ok(())
    }

    /// The persisted category filter (`"all"` when never set)
    pub fn selected_filter(&self) -> &str {
        &self.selected_filter
    }

    /// Persist a new category filter selection
    pub fn set_selected_filter(&mut self, selector: &str) -> Result<(), StoreError> {
        let selector = selector.trim();
        let selector = if selector.is_empty() {
            categories::ALL_CATEGORIES
        } else {
            selector
        };
        self.selected_filter = selector.to_string();
        write_json(&self.data_dir.join(FILTER_FILE), &self.selected_filter)?;
        Ok(())
    }

    /// Distinct categories of the current collection, first-seen order
    pub fn categories(&self) -> Vec<String> {
        categories::categories_of(&self.quotes)
    }

    /// The collection filtered by the active selector
    pub fn filtered_quotes(&self) -> Vec<Quote> {
        categories::filter_quotes(&self.quotes, &self.selected_filter)
    }

    fn persist(&self) -> Result<(), StoreError> {
        write_json(&self.data_dir.join(QUOTES_FILE), &self.quotes)?;
        Ok(())
    }
}
