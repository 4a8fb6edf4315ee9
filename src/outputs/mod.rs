//! Boundary layer between the pipeline and whoever consumes its result.
//!
//! # Submodules
//!
//! - [`schema`]: Checks a ranked result set before it is handed out
//! - [`json`]: The `{success, data}` / `{error}` envelope and its writer

pub mod json;
pub mod schema;

pub use json::{ApiResponse, write_response};
pub use schema::validate_entries;
