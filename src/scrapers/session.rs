//! Listing session: owns the connection to the remote listing and the page
//! currently loaded in it.
//!
//! A session is created per pipeline run, passed by `&mut` into the walker,
//! and closed by whoever opened it on every exit path.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::{Result, ScrapeError};
use crate::scrapers::extract::next_page_href;

/// Page-level access to a paginated listing.
///
/// Implementors hold exactly one loaded page at a time.
pub trait ListingSession {
    /// Markup of the page currently loaded.
    fn current_html(&self) -> &str;

    /// Activate the listing's "load more" control.
    ///
    /// Returns `Ok(false)` when the current page has no such control, which
    /// means the listing is exhausted. Failing to load the next page is a
    /// navigation failure.
    async fn advance(&mut self) -> Result<bool>;

    /// Release the session. Calling it twice is harmless.
    async fn close(&mut self) -> Result<()>;
}

/// [`ListingSession`] over plain HTTP: the "load more" control is an anchor,
/// so activating it means fetching its `href`.
#[derive(Debug)]
pub struct HttpListingSession {
    http: Client,
    current_url: Url,
    current_html: String,
    closed: bool,
}

impl HttpListingSession {
    /// Build the HTTP client and load the first listing page.
    #[instrument(level = "info", skip_all, fields(url = %config.listing_url))]
    pub async fn open(config: &ScrapeConfig) -> Result<Self> {
        let start = Url::parse(&config.listing_url).map_err(|source| ScrapeError::InvalidUrl {
            base: String::new(),
            href: config.listing_url.clone(),
            source,
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| ScrapeError::Navigation {
                url: config.listing_url.clone(),
                source,
            })?;

        let current_html = fetch(&http, &start).await?;
        info!(bytes = current_html.len(), "Opened listing session");

        Ok(Self {
            http,
            current_url: start,
            current_html,
            closed: false,
        })
    }

    pub fn current_url(&self) -> &Url {
        &self.current_url
    }
}

async fn fetch(http: &Client, url: &Url) -> Result<String> {
    let navigation = |source: reqwest::Error| ScrapeError::Navigation {
        url: url.to_string(),
        source,
    };

    let response = http.get(url.clone()).send().await.map_err(navigation)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().await.map_err(navigation)
}

impl ListingSession for HttpListingSession {
    fn current_html(&self) -> &str {
        &self.current_html
    }

    #[instrument(level = "debug", skip_all, fields(from = %self.current_url))]
    async fn advance(&mut self) -> Result<bool> {
        if self.closed {
            return Err(ScrapeError::SessionClosed);
        }

        let Some(href) = next_page_href(&self.current_html) else {
            debug!("No next-page control on current page");
            return Ok(false);
        };

        let next = self
            .current_url
            .join(&href)
            .map_err(|source| ScrapeError::InvalidUrl {
                base: self.current_url.to_string(),
                href: href.clone(),
                source,
            })?;

        let html = fetch(&self.http, &next).await?;
        debug!(url = %next, bytes = html.len(), "Loaded next listing page");
        self.current_url = next;
        self.current_html = html;
        Ok(true)
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.current_html.clear();
            debug!(url = %self.current_url, "Closed listing session");
        }
        Ok(())
    }
}
