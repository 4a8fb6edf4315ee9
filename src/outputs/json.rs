//! JSON envelope written for consumers of a run.
//!
//! A successful run produces
//!
//! ```text
//! {"success": true, "data": [["40000002", {"title": …, "href": …, "dateCreated": …, "commentOnPostHref": …}], …]}
//! ```
//!
//! and a failed run produces `{"error": "<message>"}`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

use crate::error::{Result, ScrapeError};
use crate::models::RankedEntry;
use crate::utils::ensure_parent_writable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Success { success: bool, data: Vec<RankedEntry> },
    Failure { error: String },
}

impl ApiResponse {
    pub fn success(data: Vec<RankedEntry>) -> Self {
        ApiResponse::Success {
            success: true,
            data,
        }
    }

    pub fn failure(error: &ScrapeError) -> Self {
        ApiResponse::Failure {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Write the envelope to `output`, or to stdout when no path is given.
#[instrument(level = "info", skip_all, fields(output = ?output, success = response.is_success()))]
pub async fn write_response(response: &ApiResponse, output: Option<&Path>, pretty: bool) -> Result<()> {
    let mut json = response.to_json(pretty)?;
    json.push('\n');

    match output {
        Some(path) => {
            ensure_parent_writable(path).await?;
            fs::write(path, &json).await?;
            info!(path = %path.display(), bytes = json.len(), "Wrote JSON response");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(json.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
