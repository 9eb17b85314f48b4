//! Filesystem infrastructure — implements `ConfigFile` and
//! `ProbeArtifactInstaller`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::{ConfigFile, ProbeArtifactInstaller};
use crate::domain::snap::PROBE_ARTIFACT_NAME;

/// Production filesystem implementation.
///
/// `probe_source` is the probe binary copied into each instance's data
/// directory when the TCP health check is enabled.
pub struct LocalFs {
    probe_source: PathBuf,
}

impl LocalFs {
    #[must_use]
    pub fn new(probe_source: PathBuf) -> Self {
        Self { probe_source }
    }

    /// Use the probe binary installed next to the running executable.
    ///
    /// # Errors
    ///
    /// Returns an error if the current executable path cannot be determined.
    pub fn with_sibling_probe() -> Result<Self> {
        let exe = std::env::current_exe().context("cannot determine current executable")?;
        Ok(Self::new(exe.with_file_name(PROBE_ARTIFACT_NAME)))
    }
}

impl ConfigFile for LocalFs {
    async fn read(&self, path: &Path) -> Result<Option<String>> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading file {}", path.display())),
        })
        .await
        .context("spawn_blocking for config read")?
    }

    async fn write(&self, path: &Path, text: &str) -> Result<()> {
        let path = path.to_path_buf();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory {}", parent.display()))?;
            }
            std::fs::write(&path, text).with_context(|| format!("writing file {}", path.display()))
        })
        .await
        .context("spawn_blocking for config write")?
    }
}

impl ProbeArtifactInstaller for LocalFs {
    async fn ensure_installed(&self, dest: &Path) -> Result<bool> {
        let src = self.probe_source.clone();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || copy_if_absent(&src, &dest))
            .await
            .context("spawn_blocking for probe install")?
    }
}

/// Copy `src` to `dest` unless `dest` already exists, marking it executable.
fn copy_if_absent(src: &Path, dest: &Path) -> Result<bool> {
    if let Some(parent) = dest.parent() {
        info!("Creating parent directories for {} if does not exist", dest.display());
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    if dest.exists() {
        return Ok(false);
    }

    std::fs::copy(src, dest)
        .with_context(|| format!("copying {} to {}", src.display(), dest.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dest, std::fs::Permissions::from_mode(0o755))
            .with_context(|| format!("setting permissions on {}", dest.display()))?;
    }
    info!("TCP health check probe copied to {}", dest.display());
    Ok(true)
}
