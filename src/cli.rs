//! Command-line interface definitions for Newest Feed.
//!
//! Every option can also come from an environment variable. Flags override
//! values read from `--config`, which override the built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use crate::config::{ScrapeConfig, load_config};
use crate::error::Result;
use crate::fetch_ranked_entries_with;
use crate::models::RankedEntry;
use crate::outputs::{ApiResponse, validate_entries, write_response};

/// Command-line arguments for the Newest Feed binary.
///
/// # Examples
///
/// ```sh
/// # Newest 100 submissions, JSON envelope on stdout
/// newest_feed
///
/// # Smaller run written to a file
/// newest_feed --max-items 30 --output ./out/newest.json --pretty
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "NEWEST_FEED_CONFIG")]
    pub config: Option<String>,

    /// First page of the listing to walk
    #[arg(short, long, env = "NEWEST_FEED_URL")]
    pub url: Option<String>,

    /// Number of entries to collect
    #[arg(short = 'n', long, env = "NEWEST_FEED_MAX_ITEMS")]
    pub max_items: Option<usize>,

    /// Ceiling on listing pages visited
    #[arg(long, env = "NEWEST_FEED_MAX_PAGES", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, env = "NEWEST_FEED_TIMEOUT_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Write the JSON response here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Layer the flags given on the command line over `base`.
    pub fn apply(&self, base: ScrapeConfig) -> ScrapeConfig {
        ScrapeConfig {
            listing_url: self.url.clone().unwrap_or(base.listing_url),
            max_items: self.max_items.unwrap_or(base.max_items),
            max_pages: self.max_pages.unwrap_or(base.max_pages),
            timeout_secs: self.timeout_secs.unwrap_or(base.timeout_secs),
            user_agent: base.user_agent,
        }
    }
}

async fn resolve_and_collect(args: &Cli) -> Result<Vec<RankedEntry>> {
    let base = match &args.config {
        Some(path) => load_config(path).await?,
        None => ScrapeConfig::default(),
    };
    let config = args.apply(base);
    info!(url = %config.listing_url, max_items = config.max_items, "newest_feed starting up");

    let entries = fetch_ranked_entries_with(&config).await?;
    validate_entries(&entries, config.max_items)?;
    Ok(entries)
}

/// Run once with `args` and write the response envelope.
///
/// The envelope is written for every outcome, configuration errors included;
/// the run's error is returned afterwards.
pub async fn execute(args: &Cli) -> Result<()> {
    let outcome = resolve_and_collect(args).await;
    let response = match &outcome {
        Ok(entries) => ApiResponse::success(entries.clone()),
        Err(e) => {
            error!(error = %e, navigation = e.is_navigation_failure(), "Run failed");
            ApiResponse::failure(e)
        }
    };
    write_response(&response, args.output.as_deref(), args.pretty).await?;
    outcome.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["newest_feed"]);
        assert!(cli.output.is_none());
        assert!(!cli.pretty);
        assert_eq!(cli.apply(ScrapeConfig::default()), ScrapeConfig::default());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "newest_feed",
            "--url",
            "http://localhost:9000/newest",
            "-n",
            "30",
            "--max-pages",
            "3",
            "-o",
            "/tmp/newest.json",
        ]);
        let base = ScrapeConfig {
            timeout_secs: 5,
            ..ScrapeConfig::default()
        };
        let config = cli.apply(base);

        assert_eq!(config.listing_url, "http://localhost:9000/newest");
        assert_eq!(config.max_items, 30);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/newest.json")));
    }

    #[tokio::test]
    async fn test_execute_writes_error_envelope_for_missing_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("newest.json");
        let cli = Cli::parse_from([
            "newest_feed",
            "--config",
            "/nonexistent/newest_feed.yaml",
            "--output",
            out.to_str().unwrap(),
        ]);

        let err = execute(&cli).await.unwrap_err();
        assert!(matches!(err, crate::error::ScrapeError::Config { .. }));

        let written = std::fs::read_to_string(&out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert!(value["error"].as_str().unwrap().contains("/nonexistent/newest_feed.yaml"));
        assert!(value.get("success").is_none());
    }

    #[test]
    fn test_cli_rejects_zero_page_ceiling() {
        let result = Cli::try_parse_from(["newest_feed", "--max-pages", "0"]);
        assert!(result.is_err());
    }
}
