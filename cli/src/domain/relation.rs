//! Cluster membership and socket relation views decoded from raw relation data.
//!
//! Relation data arrives as a flat string map. List-valued fields are
//! JSON-encoded strings, and the literal `null` means "not published".

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::error::RelationError;

pub const CLUSTER_RELATION: &str = "consul-cluster";
pub const NOTIFY_RELATION: &str = "consul-notify";

const DATACENTER: &str = "datacenter";
const GOSSIP_ENDPOINTS: &str = "external_gossip_endpoints";
const HEALTHCHECK_ENDPOINTS: &str = "external_gossip_healthcheck_endpoints";
const NOTIFY_SNAP_NAME: &str = "snap_name";
const NOTIFY_SOCKET_PATH: &str = "unix_socket_filepath";

/// Raw key/value relation data.
pub type Databag = BTreeMap<String, String>;

/// Snapshot of the cluster membership published by the consul servers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterMembership {
    pub datacenter: Option<String>,
    pub gossip_endpoints: Option<Vec<String>>,
    pub healthcheck_endpoints: Option<Vec<String>>,
}

impl ClusterMembership {
    /// Decode the cluster relation databag.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint field is present but is not a JSON list
    /// of strings.
    pub fn from_databag(bag: &Databag) -> Result<Self, RelationError> {
        Ok(Self {
            datacenter: bag
                .get(DATACENTER)
                .filter(|dc| !dc.is_empty())
                .cloned(),
            gossip_endpoints: decode_list(bag, GOSSIP_ENDPOINTS)?,
            healthcheck_endpoints: decode_list(bag, HEALTHCHECK_ENDPOINTS)?,
        })
    }

    /// Datacenter and join addresses, when both are available.
    #[must_use]
    pub fn required(&self) -> Option<(&str, &[String])> {
        let datacenter = self.datacenter.as_deref()?;
        let join = self.gossip_endpoints.as_deref().filter(|e| !e.is_empty())?;
        Some((datacenter, join))
    }
}

fn decode_list(bag: &Databag, field: &'static str) -> Result<Option<Vec<String>>, RelationError> {
    let Some(raw) = bag.get(field) else {
        return Ok(None);
    };
    serde_json::from_str::<Option<Vec<String>>>(raw).map_err(|e| RelationError::InvalidField {
        relation: CLUSTER_RELATION,
        field,
        reason: e.to_string(),
    })
}

/// Socket published by the companion process that receives NIC alerts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotifyEndpoint {
    pub snap_name: Option<String>,
    pub socket_path: Option<String>,
}

impl NotifyEndpoint {
    #[must_use]
    pub fn from_databag(bag: &Databag) -> Self {
        let field = |key: &str| bag.get(key).filter(|v| !v.is_empty()).cloned();
        Self {
            snap_name: field(NOTIFY_SNAP_NAME),
            socket_path: field(NOTIFY_SOCKET_PATH),
        }
    }

    /// Both the companion snap and its socket path are known.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.snap_name.is_some() && self.socket_path.is_some()
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
