//! Shape check applied to a result set before it leaves the process.

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::correlate::identifier_from_comment_link;
use crate::error::{Result, ScrapeError};
use crate::models::RankedEntry;

/// Validate a ranked result set.
///
/// Rejects empty fields, entries whose comment link points at a different
/// identifier, more than `max_items` entries, and any adjacent pair whose
/// parseable timestamps are in ascending order.
#[instrument(level = "debug", skip_all, fields(count = entries.len(), max_items = max_items))]
pub fn validate_entries(entries: &[RankedEntry], max_items: usize) -> Result<()> {
    let fail = |message: String| Err(ScrapeError::ValidationFailure(message));

    if entries.len() > max_items {
        return fail(format!("{} entries exceed the cap of {max_items}", entries.len()));
    }

    for (position, RankedEntry(identifier, entry)) in entries.iter().enumerate() {
        let fields = [
            ("identifier", identifier.as_str()),
            ("title", entry.title.as_str()),
            ("href", entry.href.as_str()),
            ("dateCreated", entry.date_created.as_str()),
            ("commentOnPostHref", entry.comment_on_post_href.as_str()),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return fail(format!("entry {position} has an empty `{name}`"));
        }

        let linked = identifier_from_comment_link(&entry.comment_on_post_href);
        if linked != identifier.as_str() {
            return fail(format!(
                "entry {position} (`{identifier}`) links comments of `{linked}`"
            ));
        }
    }

    let out_of_order = entries
        .iter()
        .map(|e| e.entry().posted_at())
        .tuple_windows()
        .position(|(newer, older)| matches!((newer, older), (Some(a), Some(b)) if a < b));
    if let Some(position) = out_of_order {
        return fail(format!(
            "entries {position} and {} are not newest-first",
            position + 1
        ));
    }

    debug!("Result set passed validation");
    Ok(())
}
