//! Small helpers for log formatting and output paths.

use std::fs as stdfs;
use std::path::Path;

use tokio::fs;
use tracing::{info, instrument};

use crate::error::Result;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary)
/// with `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure the directory that will hold `file_path` exists and is writable.
///
/// Creates the directory if needed, then writes and removes a scratch file.
#[instrument(level = "info", skip_all, fields(path = %file_path.display()))]
pub async fn ensure_parent_writable(file_path: &Path) -> Result<()> {
    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).await?;

    let scratch_path = dir.join("..__write_check__");
    stdfs::File::create(&scratch_path)?;
    let _ = stdfs::remove_file(&scratch_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
