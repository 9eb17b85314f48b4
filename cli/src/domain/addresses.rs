//! Address selection and `host:port` parsing for reachability targets.

use std::fmt;

use crate::domain::error::TargetError;

/// Pick the address list used for reachability monitoring.
///
/// Dedicated health-check addresses win when present and non-empty; otherwise
/// the gossip addresses are returned unchanged, even when empty. No syntax
/// validation happens here.
#[must_use]
pub fn select_addresses<'a>(gossip: &'a [String], healthcheck: Option<&'a [String]>) -> &'a [String] {
    match healthcheck {
        Some(addrs) if !addrs.is_empty() => addrs,
        _ => gossip,
    }
}

/// A parsed probe target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Address as supplied by the caller, used verbatim in logs.
    pub raw: String,
    pub host: String,
    pub port: u16,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse a `host:port` target.
///
/// Bracketed IPv6 literals (`[fd00::1]:8301`) are accepted. Any other string
/// containing more than one `:` is malformed, as is a missing or non-numeric
/// port.
///
/// # Errors
///
/// Returns [`TargetError`] if `raw` is not a valid `host:port` pair.
pub fn parse_target(raw: &str) -> Result<Target, TargetError> {
    let (host, port) = if let Some(rest) = raw.strip_prefix('[') {
        rest.split_once("]:")
            .ok_or_else(|| TargetError::Malformed(raw.to_string()))?
    } else {
        let mut parts = raw.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(host), Some(port), None) => (host, port),
            _ => return Err(TargetError::Malformed(raw.to_string())),
        }
    };

    if host.is_empty() {
        return Err(TargetError::Malformed(raw.to_string()));
    }
    let port = port.parse::<u16>().map_err(|_| TargetError::InvalidPort {
        address: raw.to_string(),
        port: port.to_string(),
    })?;

    Ok(Target {
        raw: raw.to_string(),
        host: host.to_string(),
        port,
    })
}

/// Parse every target, failing on the first malformed entry.
///
/// # Errors
///
/// Returns the first [`TargetError`] encountered.
pub fn parse_targets(raw: &[String]) -> Result<Vec<Target>, TargetError> {
    raw.iter().map(|s| parse_target(s)).collect()
}

// ── Unit tests ────────────────────────────────────────────────────────────────
