//! Data models for scraped listing rows and their merged representation.
//!
//! This module defines the structures that flow through the pipeline:
//! - [`RawItemRecord`] / [`RawDateRecord`]: unvalidated rows read from one listing page
//! - [`ListingPage`]: an immutable snapshot of both row streams for one page
//! - [`CanonicalEntry`]: a validated, merged article
//! - [`RankedEntry`]: the `(identifier, entry)` pair handed to consumers
//!
//! [`CanonicalEntry`] uses camelCase field names on the wire to match the
//! shape the display layer consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rank::parse_posted_at;

/// One article row of a listing page.
///
/// The identifier is always read (an absent `id` attribute becomes the empty
/// string); title and link stay optional so a single malformed row does not
/// abort extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItemRecord {
    pub identifier: String,
    pub title: Option<String>,
    pub link: Option<String>,
}

/// The date row that accompanies an article row.
///
/// It carries no identifier of its own; `comment_link` ends with the
/// article's identifier as its final query value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawDateRecord {
    pub display_date: Option<String>,
    pub comment_link: Option<String>,
}

/// Both row streams of one listing page, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub items: Vec<RawItemRecord>,
    pub dates: Vec<RawDateRecord>,
}

impl ListingPage {
    /// Keep only the first `n` rows of each stream.
    pub fn truncated(mut self, n: usize) -> Self {
        self.items.truncate(n);
        self.dates.truncate(n);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A validated article with its posting date attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEntry {
    /// Article title as rendered in the listing.
    pub title: String,
    /// Link target of the title.
    pub href: String,
    /// Raw posting timestamp; the first whitespace token is a UTC-naive instant.
    pub date_created: String,
    /// Link to the article's discussion page.
    pub comment_on_post_href: String,
}

impl CanonicalEntry {
    /// Posting instant, or `None` when `date_created` cannot be parsed.
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        parse_posted_at(&self.date_created)
    }
}

/// An `(identifier, entry)` pair. Serializes as a two-element JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry(pub String, pub CanonicalEntry);

impl RankedEntry {
    pub fn identifier(&self) -> &str {
        &self.0
    }

    pub fn entry(&self) -> &CanonicalEntry {
        &self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> RankedEntry {
        RankedEntry(
            "40000001".to_string(),
            CanonicalEntry {
                title: "Show HN: A thing (example.com)".to_string(),
                href: "https://example.com/thing".to_string(),
                date_created: "2024-05-01T12:34:56 1714566896".to_string(),
                comment_on_post_href: "item?id=40000001".to_string(),
            },
        )
    }

    #[test]
    fn test_ranked_entry_serializes_as_tuple() {
        let json = serde_json::to_value(sample_entry()).unwrap();
        assert_eq!(json[0], "40000001");
        assert_eq!(json[1]["title"], "Show HN: A thing (example.com)");
        assert_eq!(json[1]["href"], "https://example.com/thing");
        assert_eq!(json[1]["dateCreated"], "2024-05-01T12:34:56 1714566896");
        assert_eq!(json[1]["commentOnPostHref"], "item?id=40000001");
    }

    #[test]
    fn test_ranked_entry_deserializes_from_tuple() {
        let raw = r#"["7", {"title": "t", "href": "h", "dateCreated": "d", "commentOnPostHref": "item?id=7"}]"#;
        let entry: RankedEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.identifier(), "7");
        assert_eq!(entry.entry().href, "h");
    }

    #[test]
    fn test_posted_at_uses_first_token() {
        let posted = sample_entry().entry().posted_at().unwrap();
        assert_eq!(posted.to_rfc3339(), "2024-05-01T12:34:56+00:00");
    }

    #[test]
    fn test_listing_page_truncated_keeps_page_order() {
        let page = ListingPage {
            items: (0..5)
                .map(|i| RawItemRecord {
                    identifier: i.to_string(),
                    title: None,
                    link: None,
                })
                .collect(),
            dates: vec![RawDateRecord::default(); 5],
        };
        let cut = page.truncated(2);
        assert_eq!(cut.len(), 2);
        assert_eq!(cut.dates.len(), 2);
        assert_eq!(cut.items[1].identifier, "1");
    }
}
