//! Infrastructure implementation of the `FailureStateStore` port.
//!
//! `JsonStateStore` provides async load/save using `tokio::task::spawn_blocking`
//! with atomic write (temp file + rename) so a crash mid-write never leaves a
//! truncated counter behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use consul_client_common::FailureState;

use crate::application::ports::FailureStateStore;
use crate::domain::health::STATE_FILE_NAME;
use crate::infra::alert::SNAP_DATA_ENV;

/// Failure counter file backing the `FailureStateStore` port.
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// Create a store at the default location: `$SNAP_DATA/tcp_health_check_state.json`,
    /// or the system temp directory when `SNAP_DATA` is unset.
    #[must_use]
    pub fn new() -> Self {
        let dir = std::env::var_os(SNAP_DATA_ENV)
            .map_or_else(std::env::temp_dir, PathBuf::from);
        Self::with_path(dir.join(STATE_FILE_NAME))
    }

    /// Create a store with an explicit path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Synchronous load, run by `load` inside `spawn_blocking`.
    fn load_sync(&self) -> Result<Option<FailureState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading state file {}", self.path.display()))?;
        let state: FailureState = serde_json::from_str(&content)
            .with_context(|| format!("parsing state file {}", self.path.display()))?;
        Ok(Some(state))
    }

    /// Synchronous save, run by `save` inside `spawn_blocking`.
    fn save_sync(&self, state: FailureState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string(&state).context("serializing state")?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("finalizing state file {}", self.path.display()))?;

        Ok(())
    }
}

impl Default for JsonStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureStateStore for JsonStateStore {
    async fn load(&self) -> Result<Option<FailureState>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || JsonStateStore::with_path(path).load_sync())
            .await
            .context("state load task panicked")?
    }

    async fn save(&self, state: FailureState) -> Result<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || JsonStateStore::with_path(path).save_sync(state))
            .await
            .context("state save task panicked")?
    }
}
