//! Category index
//!
//! Derived data over the quote collection: the distinct category set and
//! category-filtered views. Categories are derived, so an unknown
//! selector filters to an empty result instead of erroring.

use crate::types::Quote;

/// Selector value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// Distinct categories of a collection, in first-seen order
pub fn categories_of(quotes: &[Quote]) -> Vec<String> {
    let mut seen = Vec::new();
    for quote in quotes {
        if !seen.iter().any(|c| c == &quote.category) {
            seen.push(quote.category.clone());
        }
    }
    seen
}

/// Quotes matching a category selector, preserving order
///
/// `"all"` returns the whole collection unchanged. An unknown category
/// yields an empty result.
pub fn filter_quotes(quotes: &[Quote], selector: &str) -> Vec<Quote> {
    if selector == ALL_CATEGORIES {
        return quotes.to_vec();
    }
    quotes
        .iter()
        .filter(|q| q.category == selector)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Quote> {
        vec![
            Quote::new("a", "Motivation").unwrap(),
            Quote::new("b", "Life").unwrap(),
            Quote::new("c", "Motivation").unwrap(),
            Quote::new("d", "Education").unwrap(),
        ]
    }

    #[test]
    fn test_categories_first_seen_order() {
        let categories = categories_of(&sample());
        assert_eq!(categories, vec!["Motivation", "Life", "Education"]);
    }

    #[test]
    fn test_categories_of_empty() {
        assert!(categories_of(&[]).is_empty());
    }

    #[test]
    fn test_filter_all_is_identity() {
        let quotes = sample();
        assert_eq!(filter_quotes(&quotes, ALL_CATEGORIES), quotes);
    }

    #[test]
    fn test_filter_by_category_preserves_order() {
        let filtered = filter_quotes(&sample(), "Motivation");
        let texts: Vec<&str> = filtered.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_unknown_category_is_empty() {
        assert!(filter_quotes(&sample(), "Cooking").is_empty());
    }
}
