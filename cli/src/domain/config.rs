//! Operator toggles for the consul client.
//!
//! Pure types only, no I/O.

use serde::{Deserialize, Serialize};

use crate::domain::consul_config::PortSet;

/// Toggles stored in `~/.consul-client/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientConfig {
    /// LAN gossip port advertised by this agent.
    pub serf_lan_port: i32,
    /// Run the TCP health check when a notify socket is available.
    pub enable_health_check: bool,
    /// Store channel the agent package tracks.
    pub snap_channel: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            serf_lan_port: 8301,
            enable_health_check: true,
            snap_channel: "latest/stable".to_string(),
        }
    }
}

impl ClientConfig {
    /// Port set for this cycle: everything but LAN gossip and server RPC disabled.
    #[must_use]
    pub fn ports(&self) -> PortSet {
        PortSet::client(self.serf_lan_port)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
