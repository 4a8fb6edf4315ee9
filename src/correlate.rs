//! Merge the article stream and the date stream into canonical entries.
//!
//! Article rows and date rows are separate elements in the listing markup.
//! The only thing tying a date row to its article is the comment link, whose
//! final query value is the article identifier (`item?id=40000001`).
//!
//! Correlation is fail-closed: one bad pair discards the whole batch.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ScrapeError};
use crate::models::{CanonicalEntry, ListingPage, RankedEntry, RawDateRecord, RawItemRecord};

/// Identifier encoded in a comment link: everything after the last `=`.
pub fn identifier_from_comment_link(href: &str) -> &str {
    href.rsplit('=').next().unwrap_or(href)
}

/// Check that the flattened article and date streams have equal length.
pub fn check_stream_counts(pages: &[ListingPage]) -> Result<usize> {
    let items: usize = pages.iter().map(|p| p.items.len()).sum();
    let dates: usize = pages.iter().map(|p| p.dates.len()).sum();
    if items != dates {
        return Err(ScrapeError::CorrelationCountMismatch { items, dates });
    }
    Ok(items)
}

/// A value that is absent, empty, or only whitespace counts as missing.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn merge_pair(index: usize, item: &RawItemRecord, date: &RawDateRecord) -> Result<CanonicalEntry> {
    let incomplete = |reason: String| ScrapeError::IncompleteArticleRecord {
        index,
        identifier: item.identifier.clone(),
        reason,
    };

    if let Some(link) = present(&date.comment_link) {
        let recovered = identifier_from_comment_link(link);
        if recovered != item.identifier {
            return Err(incomplete(format!(
                "date row belongs to `{recovered}`"
            )));
        }
    }

    match (
        present(&item.title),
        present(&item.link),
        present(&date.display_date),
        present(&date.comment_link),
    ) {
        (Some(title), Some(href), Some(date_created), Some(comment)) => Ok(CanonicalEntry {
            title: title.to_string(),
            href: href.to_string(),
            date_created: date_created.to_string(),
            comment_on_post_href: comment.to_string(),
        }),
        (title, href, date_created, comment) => {
            let missing = [
                ("title", title.is_none()),
                ("link", href.is_none()),
                ("displayDate", date_created.is_none()),
                ("commentLink", comment.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .join(", ");
            Err(incomplete(format!("missing {missing}")))
        }
    }
}

/// Correlate every article row with the date row at the same flattened position.
///
/// Entries come back in collection order. A repeated identifier overwrites
/// the earlier value but keeps the earlier position.
#[instrument(level = "info", skip_all, fields(pages = pages.len()))]
pub fn correlate(pages: &[ListingPage]) -> Result<Vec<RankedEntry>> {
    let total = check_stream_counts(pages)?;

    let items = pages.iter().flat_map(|p| p.items.iter());
    let dates = pages.iter().flat_map(|p| p.dates.iter());

    let mut positions: HashMap<String, usize> = HashMap::with_capacity(total);
    let mut merged: Vec<RankedEntry> = Vec::with_capacity(total);

    for (index, (item, date)) in items.zip_eq(dates).enumerate() {
        let entry = merge_pair(index, item, date)?;
        match positions.get(&item.identifier) {
            Some(&pos) => {
                warn!(identifier = %item.identifier, index, "Duplicate identifier; keeping latest row");
                merged[pos].1 = entry;
            }
            None => {
                positions.insert(item.identifier.clone(), merged.len());
                merged.push(RankedEntry(item.identifier.clone(), entry));
            }
        }
    }

    debug!(rows = total, unique = merged.len(), "Correlated listing rows");
    info!(count = merged.len(), "Correlation complete");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> RawItemRecord {
        RawItemRecord {
            identifier: id.to_string(),
            title: Some(format!("Story {id} (example.com)")),
            link: Some(format!("https://example.com/{id}")),
        }
    }

    fn date(id: &str) -> RawDateRecord {
        RawDateRecord {
            display_date: Some("2024-05-01T08:00:00 1714550400".to_string()),
            comment_link: Some(format!("item?id={id}")),
        }
    }

    fn page(ids: &[&str]) -> ListingPage {
        ListingPage {
            items: ids.iter().map(|id| item(id)).collect(),
            dates: ids.iter().map(|id| date(id)).collect(),
        }
    }

    #[test]
    fn test_identifier_from_comment_link() {
        assert_eq!(identifier_from_comment_link("item?id=40000001"), "40000001");
        assert_eq!(identifier_from_comment_link("a=b&c=d"), "d");
        assert_eq!(identifier_from_comment_link("no-params"), "no-params");
    }

    #[test]
    fn test_correlate_across_pages_in_order() {
        let entries = correlate(&[page(&["1", "2"]), page(&["3"])]).unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.identifier()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(entries[2].entry().comment_on_post_href, "item?id=3");
        assert_eq!(entries[0].entry().title, "Story 1 (example.com)");
    }

    #[test]
    fn test_count_mismatch_is_fatal() {
        let mut short = page(&["1", "2", "3"]);
        short.dates.pop();
        let err = correlate(&[page(&["0"]), short]).unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::CorrelationCountMismatch { items: 4, dates: 3 }
        ));
    }

    #[test]
    fn test_count_mismatch_tolerates_uneven_pages_with_equal_totals() {
        // Totals are what is checked; position then decides the pairing.
        let mut first = page(&["1", "2"]);
        let mut second = page(&["3"]);
        let moved = first.dates.pop().unwrap();
        second.dates.insert(0, moved);
        let entries = correlate(&[first, second]).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_single_mismatched_identifier_discards_everything() {
        let mut rows = page(&["1", "2", "3", "4", "5"]);
        rows.dates[3].comment_link = Some("item?id=999".to_string());
        let err = correlate(&[rows]).unwrap_err();
        match err {
            ScrapeError::IncompleteArticleRecord {
                index,
                identifier,
                reason,
            } => {
                assert_eq!(index, 3);
                assert_eq!(identifier, "4");
                assert!(reason.contains("999"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_comment_link_is_incomplete() {
        let mut rows = page(&["1", "2", "3", "4", "5"]);
        rows.dates[2].comment_link = None;
        let err = correlate(&[rows]).unwrap_err();
        match err {
            ScrapeError::IncompleteArticleRecord { index, reason, .. } => {
                assert_eq!(index, 2);
                assert_eq!(reason, "missing commentLink");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let mut rows = page(&["1"]);
        rows.items[0].title = None;
        rows.dates[0].display_date = None;
        let err = correlate(&[rows]).unwrap_err();
        assert!(err.to_string().contains("missing title, displayDate"));
    }

    #[test]
    fn test_blank_fields_count_as_missing() {
        let mut rows = page(&["7"]);
        rows.items[0].link = Some(String::new());
        rows.dates[0].display_date = Some("  ".to_string());
        let err = correlate(&[rows]).unwrap_err();
        match err {
            ScrapeError::IncompleteArticleRecord { index, identifier, reason } => {
                assert_eq!(index, 0);
                assert_eq!(identifier, "7");
                assert_eq!(reason, "missing link, displayDate");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_identifier_last_write_wins_first_position() {
        let mut rows = page(&["1", "2", "1"]);
        rows.items[2].title = Some("Updated".to_string());
        let entries = correlate(&[rows]).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].identifier(), "1");
        assert_eq!(entries[0].entry().title, "Updated");
        assert_eq!(entries[1].identifier(), "2");
    }

    #[test]
    fn test_empty_input() {
        assert!(correlate(&[]).unwrap().is_empty());
    }
}
