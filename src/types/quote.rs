//! Quote types
//!
//! Defines the quote structure shared by the store and the sync layer.

use serde::{Deserialize, Serialize};

/// Optional quote identifier
///
/// Remote snapshots carry numeric ids, imported files sometimes carry
/// string ids, and locally authored quotes carry none. Merge identity is
/// the quote text, never the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteId {
    /// Numeric id, as returned by the remote endpoint
    Number(i64),
    /// String id, as seen in some imported files
    Text(String),
}

/// A single quote: text plus category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Optional id; not used for merge identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuoteId>,
    /// The quote text; non-empty after trimming
    pub text: String,
    /// The category label; non-empty after trimming
    pub category: String,
}

impl Quote {
    /// Create a quote, trimming surrounding whitespace from both fields.
    ///
    /// Returns `None` if either field is empty after trimming.
    pub fn new(text: impl AsRef<str>, category: impl AsRef<str>) -> Option<Self> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();
        if text.is_empty() || category.is_empty() {
            return None;
        }
        Some(Self {
            id: None,
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Whether both fields hold the non-empty invariant
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_creation_trims() {
        let quote = Quote::new("  be curious  ", " Life ").unwrap();
        assert_eq!(quote.text, "be curious");
        assert_eq!(quote.category, "Life");
        assert!(quote.id.is_none());
    }

    #[test]
    fn test_quote_creation_rejects_empty() {
        assert!(Quote::new("", "Life").is_none());
        assert!(Quote::new("be curious", "").is_none());
        assert!(Quote::new("   ", "   ").is_none());
    }

    #[test]
    fn test_quote_id_untagged() {
        let quote: Quote =
            serde_json::from_str(r#"{"id": 7, "text": "a", "category": "b"}"#).unwrap();
        assert_eq!(quote.id, Some(QuoteId::Number(7)));

        let quote: Quote =
            serde_json::from_str(r#"{"id": "q-7", "text": "a", "category": "b"}"#).unwrap();
        assert_eq!(quote.id, Some(QuoteId::Text("q-7".to_string())));
    }

    #[test]
    fn test_missing_id_not_serialized() {
        let quote = Quote::new("a", "b").unwrap();
        let json = serde_json::to_string(&quote).unwrap();
        assert!(!json.contains("\"id\""));
    }
}
