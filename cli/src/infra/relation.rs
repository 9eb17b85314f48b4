//! Relation infrastructure: implements `RelationSource` from JSON files.
//!
//! The event source drops one file per relation into a directory:
//! `consul-cluster.json` and `consul-notify.json`. A missing file means the
//! relation is not joined.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::RelationSource;
use crate::domain::relation::{
    CLUSTER_RELATION, ClusterMembership, Databag, NOTIFY_RELATION, NotifyEndpoint,
};

pub struct JsonRelationSource {
    dir: PathBuf,
}

impl JsonRelationSource {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    async fn databag(&self, relation: &str) -> Result<Databag> {
        let path = self.dir.join(format!("{relation}.json"));
        tokio::task::spawn_blocking(move || read_databag(&path))
            .await
            .context("spawn_blocking for relation read")?
    }
}

/// Read a databag, stringifying non-string values so both raw transport
/// data and hand-written JSON are accepted.
fn read_databag(path: &Path) -> Result<Databag> {
    if !path.exists() {
        return Ok(Databag::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading relation data {}", path.display()))?;
    let raw: std::collections::BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)
        .with_context(|| format!("parsing relation data {}", path.display()))?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect())
}

impl RelationSource for JsonRelationSource {
    async fn cluster(&self) -> Result<ClusterMembership> {
        let bag = self.databag(CLUSTER_RELATION).await?;
        Ok(ClusterMembership::from_databag(&bag)?)
    }

    async fn notify(&self) -> Result<NotifyEndpoint> {
        let bag = self.databag(NOTIFY_RELATION).await?;
        Ok(NotifyEndpoint::from_databag(&bag))
    }
}
