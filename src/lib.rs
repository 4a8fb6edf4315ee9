//! # Newest Feed
//!
//! Collects the most recent submissions from a paginated listings site,
//! attaches each one's posting date, and returns them newest-first.
//!
//! ## Architecture
//!
//! One run is a strictly sequential pipeline over a single listing session:
//! 1. **Walk**: follow the listing's "load more" control until `max_items`
//!    rows are seen, cutting the last page short if needed ([`scrapers::walker`])
//! 2. **Extract**: read the article rows and the date rows of every page
//!    as two separate streams ([`scrapers::extract`])
//! 3. **Correlate**: pair the streams through the identifier embedded in each
//!    date row's comment link, failing the whole run on any bad pair ([`correlate`])
//! 4. **Rank**: sort by posting instant, newest first ([`rank`])
//!
//! ## Usage
//!
//! ```no_run
//! # async fn demo() -> Result<(), newest_feed::ScrapeError> {
//! let entries = newest_feed::fetch_ranked_entries().await?;
//! for entry in &entries {
//!     println!("{} {}", entry.identifier(), entry.entry().title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod correlate;
pub mod error;
pub mod models;
pub mod outputs;
pub mod rank;
pub mod scrapers;
pub mod utils;

use tracing::{info, instrument, warn};

pub use config::{MAX_ITEMS, ScrapeConfig};
pub use error::ScrapeError;
pub use models::{CanonicalEntry, RankedEntry};

use scrapers::{HttpListingSession, ListingSession, walk_listing};

/// Fetch the newest entries from the default listing with default limits.
pub async fn fetch_ranked_entries() -> error::Result<Vec<RankedEntry>> {
    fetch_ranked_entries_with(&ScrapeConfig::default()).await
}

/// Open a session on `config.listing_url`, run the pipeline, and close the
/// session whether or not the run succeeded.
///
/// A failure while closing is logged and does not replace the run's result.
#[instrument(level = "info", skip_all, fields(url = %config.listing_url, max_items = config.max_items))]
pub async fn fetch_ranked_entries_with(config: &ScrapeConfig) -> error::Result<Vec<RankedEntry>> {
    let mut session = HttpListingSession::open(config).await?;
    run_and_close(&mut session, config).await
}

/// Run the pipeline on `session`, then close it on every exit path.
///
/// The pipeline's own outcome is returned; a failure while closing is only logged.
pub async fn run_and_close<S: ListingSession>(
    session: &mut S,
    config: &ScrapeConfig,
) -> error::Result<Vec<RankedEntry>> {
    let result = run_pipeline(session, config).await;
    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close listing session");
    }
    result
}

/// Walk, correlate and rank using an already opened session.
///
/// The caller keeps ownership of the session and is responsible for closing it.
#[instrument(level = "info", skip_all)]
pub async fn run_pipeline<S: ListingSession>(
    session: &mut S,
    config: &ScrapeConfig,
) -> error::Result<Vec<RankedEntry>> {
    let walk = walk_listing(session, config.limits()).await?;
    let entries = correlate::correlate(&walk.pages)?;
    let ranked = rank::rank_entries(entries);
    info!(
        count = ranked.len(),
        pages = walk.pages_visited,
        stop = ?walk.stop,
        "Pipeline complete"
    );
    Ok(ranked)
}
