//! Application service — reconcile the on-disk consul configuration.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::ConfigFile;
use crate::domain::consul_config::ConsulConfig;

/// Compare `config` against the persisted file and write it if it differs.
///
/// A missing file reads as empty text, so the first run always writes.
/// Returns `true` when the file was written and the agent needs a restart.
///
/// # Errors
///
/// Returns an error if the new document cannot be serialized or written.
/// Read failures other than "not found" are also errors.
pub async fn reconcile(file: &impl ConfigFile, path: &Path, config: &ConsulConfig) -> Result<bool> {
    let current = match file.read(path).await? {
        Some(text) => text,
        None => {
            info!(path = %path.display(), "consul config file not present yet");
            String::new()
        }
    };

    let desired = config.to_json()?;
    if current == desired {
        return Ok(false);
    }

    file.write(path, &desired)
        .await
        .with_context(|| format!("writing consul config {}", path.display()))?;
    info!(path = %path.display(), "consul configuration file updated");
    Ok(true)
}
