//! Application service — build the consul client configuration.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::ProbeArtifactInstaller;
use crate::domain::consul_config::{ConfigInputs, ConsulConfig};

/// Output of one build.
#[derive(Debug, Clone)]
pub struct BuiltConfig {
    pub config: ConsulConfig,
    /// The probe artifact was copied into place during this build.
    pub artifact_installed: bool,
}

/// Build the configuration document, placing the probe artifact first when
/// the TCP health check is active.
///
/// # Errors
///
/// Returns an error if the probe artifact cannot be copied.
pub async fn build_config(
    installer: &impl ProbeArtifactInstaller,
    inputs: &ConfigInputs<'_>,
) -> Result<BuiltConfig> {
    let mut artifact_installed = false;
    if inputs.health_check_active() {
        artifact_installed = installer
            .ensure_installed(inputs.probe_command)
            .await
            .with_context(|| {
                format!(
                    "installing TCP health check probe at {}",
                    inputs.probe_command.display()
                )
            })?;
        if artifact_installed {
            info!(path = %inputs.probe_command.display(), "TCP health check probe installed");
        }
    }
    Ok(BuiltConfig {
        config: inputs.build(),
        artifact_installed,
    })
}
