//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Probe target errors ───────────────────────────────────────────────────────

/// A reachability target that is not a `host:port` string.
///
/// Fatal for the whole probing round: the round aborts before any server is
/// contacted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("invalid server address '{0}': expected host:port")]
    Malformed(String),

    #[error("invalid port in server address '{address}': {port:?} is not in 0-65535")]
    InvalidPort { address: String, port: String },
}

// ── Package errors ────────────────────────────────────────────────────────────

/// Errors raised by the agent package manager.
#[derive(Debug, Error)]
pub enum SnapError {
    #[error("snap {action} {name} failed: {stderr}")]
    CommandFailed {
        action: &'static str,
        name: String,
        stderr: String,
    },

    #[error("invalid snap instance key '{0}': must match ^[a-z0-9]{{1,10}}$")]
    InvalidInstanceKey(String),
}

// ── Relation errors ───────────────────────────────────────────────────────────

/// Relation data that is present but cannot be decoded.
#[derive(Debug, Error)]
pub enum RelationError {
    #[error("relation {relation}: field '{field}' is not a JSON list of strings: {reason}")]
    InvalidField {
        relation: &'static str,
        field: &'static str,
        reason: String,
    },
}
