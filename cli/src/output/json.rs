//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a trigger fails, and the one-line status object emitted on each status
//! change.

use anyhow::{Context, Result};

use crate::domain::status::UnitStatus;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a unit status as a compact JSON object, e.g.
/// `{"status":"blocked","message":"Integration consul-cluster missing"}`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_status(status: &UnitStatus) -> Result<String> {
    serde_json::to_string(status).context("JSON serialization failed")
}
