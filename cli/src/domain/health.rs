//! Reachability monitor state machine and alert reply interpretation.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take data in and return data out.

use std::time::Duration;

use consul_client_common::{AlertResponse, ResponseStatus};
use serde_json::{Map, Value};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Consecutive failed rounds before an alert fires.
pub const DEFAULT_MONITORING_SAMPLES: u32 = 3;

/// Connect timeout for each probed server.
pub const TCP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// File name of the persisted failure counter.
pub const STATE_FILE_NAME: &str = "tcp_health_check_state.json";

// ── Monitor state ─────────────────────────────────────────────────────────────

/// Where the persisted failure counter sits relative to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// No failures recorded.
    Ok,
    /// Some consecutive failures, below the threshold.
    Degraded,
    /// Threshold reached, an alert is due.
    Alerting,
}

impl MonitorState {
    #[must_use]
    pub fn classify(failure_count: u32, threshold: u32) -> Self {
        if failure_count == 0 {
            Self::Ok
        } else if failure_count < threshold {
            Self::Degraded
        } else {
            Self::Alerting
        }
    }
}

/// What one probing round must do with the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAction {
    /// Every server reachable and nothing to reset: no write.
    Healthy,
    /// Every server reachable after earlier failures: persist zero.
    Recovered { previous: u32 },
    /// A server was unreachable, still below the threshold: persist `count`.
    Degraded { count: u32 },
    /// A server was unreachable and the threshold is reached: persist `count`
    /// and alert.
    Alert { count: u32 },
}

/// Decide the transition for one round.
#[must_use]
pub fn next_action(prior: u32, all_reachable: bool, threshold: u32) -> RoundAction {
    if all_reachable {
        return if prior > 0 {
            RoundAction::Recovered { previous: prior }
        } else {
            RoundAction::Healthy
        };
    }
    let count = prior.saturating_add(1);
    match MonitorState::classify(count, threshold) {
        MonitorState::Alerting => RoundAction::Alert { count },
        _ => RoundAction::Degraded { count },
    }
}

// ── Alert outcome ─────────────────────────────────────────────────────────────

/// Result of one alert send attempt. Never an error: alerting is best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Companion replied with a non-error JSON object.
    Acknowledged { response: String },
    /// Companion replied `{"status": "error"}`.
    Rejected { message: Option<String> },
    /// Connect, send, receive or reply decoding failed.
    Failed { reason: String },
}

impl AlertOutcome {
    /// The companion received the alert and answered.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Interpret the raw reply bytes read back from the alert socket.
#[must_use]
pub fn interpret_response(raw: &[u8]) -> AlertOutcome {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text.trim(),
        Err(e) => {
            return AlertOutcome::Failed {
                reason: format!("response is not UTF-8: {e}"),
            };
        }
    };
    let object = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            return AlertOutcome::Failed {
                reason: format!("response is not a JSON object: {text:?}"),
            };
        }
        Err(e) => {
            return AlertOutcome::Failed {
                reason: format!("invalid response {text:?}: {e}"),
            };
        }
    };

    let resp = read_response(&object);
    if resp.is_error() {
        AlertOutcome::Rejected {
            message: resp.message,
        }
    } else {
        AlertOutcome::Acknowledged {
            response: text.to_string(),
        }
    }
}

/// Pick `status` and `message` out of a reply object without rejecting
/// unexpected types: a non-string status is ignored, a non-string message is
/// kept in its JSON form.
fn read_response(object: &Map<String, Value>) -> AlertResponse {
    let status = object
        .get("status")
        .and_then(Value::as_str)
        .map(ResponseStatus::from_wire);
    let message = match object.get("message") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };
    AlertResponse { status, message }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
