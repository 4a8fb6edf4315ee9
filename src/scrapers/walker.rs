//! Page walker: follow the listing's pagination until enough rows are seen.
//!
//! Pages are accepted whole until the next one would overshoot the target;
//! that last page is cut to the rows still needed and the walk stops
//! without navigating further.

use std::cmp::Ordering;

use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::models::ListingPage;
use crate::scrapers::extract::extract_page;
use crate::scrapers::session::ListingSession;

/// Bounds for one walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Rows to collect before stopping.
    pub max_items: usize,
    /// Hard ceiling on pages visited, whatever the row count.
    pub max_pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Exactly `max_items` rows were collected.
    TargetReached,
    /// The last page had no "load more" control.
    SourceExhausted,
    /// `max_pages` pages were visited first.
    PageLimit,
    /// A page came back without any article rows.
    EmptyPage,
}

/// Per-page snapshots gathered by one walk, in visiting order.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub pages: Vec<ListingPage>,
    pub collected: usize,
    pub pages_visited: usize,
    pub stop: StopReason,
}

/// Walk the listing currently loaded in `session`.
///
/// Navigation errors abort the walk; nothing gathered so far is returned.
#[instrument(level = "info", skip_all, fields(max_items = limits.max_items, max_pages = limits.max_pages))]
pub async fn walk_listing<S: ListingSession>(
    session: &mut S,
    limits: WalkLimits,
) -> Result<WalkOutcome> {
    let mut pages = Vec::new();
    let mut collected = 0usize;
    let mut pages_visited = 0usize;

    if limits.max_items == 0 {
        return Ok(WalkOutcome {
            pages,
            collected,
            pages_visited,
            stop: StopReason::TargetReached,
        });
    }

    let stop = loop {
        pages_visited += 1;
        let page = extract_page(session.current_html());
        let remaining = limits.max_items - collected;
        let page_len = page.len();
        debug!(page = pages_visited, rows = page_len, collected, remaining, "Visiting listing page");

        if page.is_empty() {
            break StopReason::EmptyPage;
        }

        match page_len.cmp(&remaining) {
            Ordering::Less => {
                collected += page_len;
                pages.push(page);
            }
            Ordering::Equal => {
                collected += page_len;
                pages.push(page);
                break StopReason::TargetReached;
            }
            Ordering::Greater => {
                pages.push(page.truncated(remaining));
                collected = limits.max_items;
                break StopReason::TargetReached;
            }
        }

        if pages_visited >= limits.max_pages {
            break StopReason::PageLimit;
        }
        if !session.advance().await? {
            break StopReason::SourceExhausted;
        }
    };

    match stop {
        StopReason::TargetReached => info!(collected, pages_visited, "Listing walk reached target"),
        other => warn!(?other, collected, pages_visited, "Listing walk stopped short of target"),
    }

    Ok(WalkOutcome {
        pages,
        collected,
        pages_visited,
        stop,
    })
}
