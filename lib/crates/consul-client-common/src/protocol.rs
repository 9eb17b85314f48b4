//! NIC alert protocol spoken over the companion's local stream socket.
//!
//! The client writes one JSON [`AlertMessage`] with no framing and reads a
//! single reply of at most [`MAX_RESPONSE_BYTES`] bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version string carried in every alert message.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Upper bound on the reply read back from the socket.
pub const MAX_RESPONSE_BYTES: usize = 1024;

/// Network status reported to the companion process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkStatus {
    /// Every known server was unreachable for enough consecutive rounds.
    NicDown,
}

/// Alert sent to the companion when the agent loses reachability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertMessage {
    pub version: String,
    /// Seconds since the Unix epoch, with sub-second precision.
    pub timestamp: f64,
    pub status: NetworkStatus,
}

impl AlertMessage {
    /// Build a `nic-down` alert stamped with the given wall-clock time.
    #[must_use]
    pub fn nic_down_at(at: DateTime<Utc>) -> Self {
        #[allow(clippy::cast_precision_loss)] // microsecond epoch fits comfortably in f64
        let timestamp = at.timestamp_micros() as f64 / 1_000_000.0;
        Self {
            version: PROTOCOL_VERSION.to_string(),
            timestamp,
            status: NetworkStatus::NicDown,
        }
    }

    /// Build a `nic-down` alert stamped with the current time.
    #[must_use]
    pub fn nic_down() -> Self {
        Self::nic_down_at(Utc::now())
    }
}

/// Status field of a companion reply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
    #[serde(other)]
    Unknown,
}

impl ResponseStatus {
    /// Map a wire status string; anything unrecognized is `Unknown`.
    #[must_use]
    pub fn from_wire(status: &str) -> Self {
        match status {
            "ok" => Self::Ok,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }
}

/// Reply written back by the companion.
///
/// Both fields are optional. Replies are read leniently by callers: fields of
/// an unexpected type never make an otherwise valid JSON object unreadable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertResponse {
    #[serde(default)]
    pub status: Option<ResponseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AlertResponse {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == Some(ResponseStatus::Error)
    }
}
