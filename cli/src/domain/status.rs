//! Operator-visible unit status.

use std::fmt;

use serde::Serialize;

use crate::domain::snap::SnapName;

pub const CLUSTER_INTEGRATION_MISSING: &str = "Integration consul-cluster missing";

/// Status shown to the operator after each trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum UnitStatus {
    Active,
    Maintenance(String),
    Blocked(String),
}

impl UnitStatus {
    #[must_use]
    pub fn cluster_missing() -> Self {
        Self::Blocked(CLUSTER_INTEGRATION_MISSING.to_string())
    }

    #[must_use]
    pub fn install_failed(snap: &SnapName) -> Self {
        Self::Blocked(format!("Failed to install snap {snap}"))
    }

    #[must_use]
    pub fn restart_failed(snap: &SnapName) -> Self {
        Self::Blocked(format!("Failed to restart {snap}"))
    }

    #[must_use]
    pub fn remove_failed(snap: &SnapName) -> Self {
        Self::Blocked(format!("Failed to remove {snap}"))
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Maintenance(msg) => write!(f, "maintenance: {msg}"),
            Self::Blocked(msg) => write!(f, "blocked: {msg}"),
        }
    }
}
