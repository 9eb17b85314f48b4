use serde::{Deserialize, Serialize};

/// Persisted consecutive-failure counter of the reachability probe.
///
/// Stored as `{"failure_count": n}`. A missing field reads as zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureState {
    #[serde(default)]
    pub failure_count: u32,
}

impl FailureState {
    #[must_use]
    pub fn new(failure_count: u32) -> Self {
        Self { failure_count }
    }
}
