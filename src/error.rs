//! Error type shared by every stage of the scrape pipeline.
//!
//! Every variant is fatal to the run that produced it: the pipeline performs
//! no retries and never returns a partial result alongside an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("navigation to `{url}` failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("navigation to `{url}` returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("cannot resolve `{href}` against `{base}`: {source}")]
    InvalidUrl {
        base: String,
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("listing session already closed")]
    SessionClosed,

    #[error("collected {items} article rows but {dates} date rows")]
    CorrelationCountMismatch { items: usize, dates: usize },

    #[error("article record {index} (id `{identifier}`) is incomplete: {reason}")]
    IncompleteArticleRecord {
        index: usize,
        identifier: String,
        reason: String,
    },

    #[error("output failed validation: {0}")]
    ValidationFailure(String),

    #[error("configuration error in `{path}`: {message}")]
    Config { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// True for the failures that stem from loading or advancing the remote listing.
    pub fn is_navigation_failure(&self) -> bool {
        matches!(
            self,
            ScrapeError::Navigation { .. }
                | ScrapeError::UnexpectedStatus { .. }
                | ScrapeError::InvalidUrl { .. }
                | ScrapeError::SessionClosed
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_classification() {
        let status = ScrapeError::UnexpectedStatus {
            url: "https://example.com/newest".to_string(),
            status: 503,
        };
        assert!(status.is_navigation_failure());
        assert!(ScrapeError::SessionClosed.is_navigation_failure());

        let mismatch = ScrapeError::CorrelationCountMismatch { items: 30, dates: 29 };
        assert!(!mismatch.is_navigation_failure());
    }

    #[test]
    fn test_incomplete_record_message() {
        let err = ScrapeError::IncompleteArticleRecord {
            index: 4,
            identifier: "40000004".to_string(),
            reason: "missing commentLink".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "article record 4 (id `40000004`) is incomplete: missing commentLink"
        );
    }
}
