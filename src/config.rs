//! Run configuration.
//!
//! Values resolve in three layers: built-in defaults, then an optional YAML
//! file, then command-line flags and environment variables.
//!
//! ```yaml
//! listing_url: https://news.ycombinator.com/newest
//! max_items: 100
//! max_pages: 20
//! timeout_secs: 30
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{Result, ScrapeError};
use crate::scrapers::WalkLimits;

pub const DEFAULT_LISTING_URL: &str = "https://news.ycombinator.com/newest";
/// Number of entries a run returns when the listing has enough of them.
pub const MAX_ITEMS: usize = 100;
pub const DEFAULT_MAX_PAGES: usize = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("newest_feed/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    /// First page of the listing.
    pub listing_url: String,
    pub max_items: usize,
    /// Safety ceiling on pages visited per run.
    pub max_pages: usize,
    /// Per-request timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            max_items: MAX_ITEMS,
            max_pages: DEFAULT_MAX_PAGES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn limits(&self) -> WalkLimits {
        WalkLimits {
            max_items: self.max_items,
            max_pages: self.max_pages,
        }
    }

    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml(path: &str, yaml: &str) -> Result<Self> {
        let config: ScrapeConfig =
            serde_yaml::from_str(yaml).map_err(|e| ScrapeError::Config {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &str) -> Result<()> {
        let invalid = |message: &str| ScrapeError::Config {
            path: path.to_string(),
            message: message.to_string(),
        };
        if self.max_pages == 0 {
            return Err(invalid("max_pages must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

/// Load configuration from a YAML file.
#[instrument(level = "info")]
pub async fn load_config(path: &str) -> Result<ScrapeConfig> {
    let yaml = tokio::fs::read_to_string(path).await.map_err(|e| ScrapeError::Config {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    let config = ScrapeConfig::from_yaml(path, &yaml)?;
    info!(url = %config.listing_url, max_items = config.max_items, "Loaded configuration");
    Ok(config)
}
