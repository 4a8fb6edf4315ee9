//! Newest-first ordering of correlated entries.
//!
//! The listing renders each posting date as `"<naive UTC timestamp> <unix seconds>"`.
//! Only the text before the first space is used; it is interpreted as UTC.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{instrument, warn};

use crate::models::RankedEntry;

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse the posting instant out of a raw `dateCreated` value.
pub fn parse_posted_at(raw: &str) -> Option<DateTime<Utc>> {
    let token = raw.split(' ').next()?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&format!("{token}Z")) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(token, NAIVE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Newest first. Unparseable timestamps count as older than any parseable one.
fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort entries by posting instant, newest first.
///
/// The sort is stable, so ties and unparseable entries keep their collection
/// order. No truncation happens here.
#[instrument(level = "info", skip_all, fields(count = entries.len()))]
pub fn rank_entries(entries: Vec<RankedEntry>) -> Vec<RankedEntry> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, RankedEntry)> = entries
        .into_iter()
        .map(|entry| (entry.entry().posted_at(), entry))
        .collect();

    let unparseable = keyed.iter().filter(|(at, _)| at.is_none()).count();
    if unparseable > 0 {
        warn!(unparseable, "Entries with unparseable posting dates sorted last");
    }

    keyed.sort_by(|(a, _), (b, _)| newest_first(*a, *b));
    keyed.into_iter().map(|(_, entry)| entry).collect()
}
