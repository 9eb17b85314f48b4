//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::ClientConfig;

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.consul-client/config.yaml`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".consul-client").join("config.yaml"))
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            return Ok(ClientConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }
}
