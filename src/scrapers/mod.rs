//! Scraping side of the pipeline: loading listing pages and reading rows out of them.
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Owns the remote listing and the page currently loaded |
//! | [`extract`] | Reads the article stream and the date stream from one page |
//! | [`walker`] | Follows "load more" until enough rows are collected |
//!
//! The listing renders each submission as two table rows: an `.athing` row
//! holding the identifier, title and link, followed by a subtext row whose
//! `.age` span holds the posting timestamp and a comment link ending in the
//! identifier. Extraction keeps the two streams separate; pairing them is the
//! correlator's job.

pub mod extract;
pub mod session;
pub mod walker;

pub use session::{HttpListingSession, ListingSession};
pub use walker::{StopReason, WalkLimits, WalkOutcome, walk_listing};
