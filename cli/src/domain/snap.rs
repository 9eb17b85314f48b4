//! Agent package naming and per-instance filesystem layout.
//!
//! Several units may share a machine, so the package is installed as a
//! parallel instance whose key is derived from the unit name.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::domain::error::SnapError;

pub const CONSUL_SNAP_NAME: &str = "consul-client";
pub const CONSUL_SERVICE: &str = "consul";
pub const CONSUL_SOCKET_INTERFACE: &str = "consul-socket";
pub const DEFAULT_SNAP_ROOT: &str = "/var/snap";
pub const PROBE_ARTIFACT_NAME: &str = "tcp-health-check";

/// Upper bound imposed by snapd on instance keys.
const INSTANCE_KEY_LEN: usize = 10;

static INSTANCE_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9]{1,10}$").expect("valid regex")
});

/// Derive the parallel-install key for a unit: the first ten hex characters
/// of the SHA-256 of its name.
#[must_use]
pub fn instance_key(unit_name: &str) -> String {
    let digest = Sha256::digest(unit_name.as_bytes());
    let mut key: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    key.truncate(INSTANCE_KEY_LEN);
    key
}

/// Name of an installed agent package, optionally instance-keyed
/// (`consul-client_1a2b3c4d5e`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapName {
    base: String,
    instance_key: Option<String>,
}

impl SnapName {
    /// Build an instance-keyed name.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not 1–10 lowercase alphanumerics.
    pub fn new(base: &str, key: Option<&str>) -> Result<Self, SnapError> {
        if let Some(key) = key {
            if !INSTANCE_KEY_RE.is_match(key) {
                return Err(SnapError::InvalidInstanceKey(key.to_string()));
            }
        }
        Ok(Self {
            base: base.to_string(),
            instance_key: key.map(str::to_string),
        })
    }

    /// The consul client package for the given unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the derived key does not satisfy the store's key
    /// syntax.
    pub fn for_unit(unit_name: &str) -> Result<Self, SnapError> {
        Self::new(CONSUL_SNAP_NAME, Some(&instance_key(unit_name)))
    }

    /// Store name without the instance key.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn instance_key(&self) -> Option<&str> {
        self.instance_key.as_deref()
    }

    #[must_use]
    pub fn is_parallel_instance(&self) -> bool {
        self.instance_key.is_some()
    }
}

impl fmt::Display for SnapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance_key {
            Some(key) => write!(f, "{}_{key}", self.base),
            None => f.write_str(&self.base),
        }
    }
}

/// Filesystem locations owned by one package instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapPaths {
    common: PathBuf,
}

impl SnapPaths {
    #[must_use]
    pub fn new(root: &Path, snap: &SnapName) -> Self {
        Self {
            common: root.join(snap.to_string()).join("common").join("consul"),
        }
    }

    /// `<root>/<snap>/common/consul/config/client.json`
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.common.join("config").join("client.json")
    }

    /// `<root>/<snap>/common/consul/data/tcp-health-check`
    #[must_use]
    pub fn probe_artifact(&self) -> PathBuf {
        self.common.join("data").join(PROBE_ARTIFACT_NAME)
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
