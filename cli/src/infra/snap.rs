//! Infrastructure implementation of the `PackageManager` port.
//!
//! `SnapCtl<R>` drives the `snap` CLI through a `CommandRunner`. The package
//! name, parallel-instance key included, is fixed at construction.

use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::application::ports::{CommandRunner, PackageManager};
use crate::domain::error::SnapError;
use crate::domain::snap::SnapName;

/// Installs download from the store and can take a while.
pub const SNAP_INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Infrastructure adapter that routes all snap CLI calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct SnapCtl<R: CommandRunner> {
    runner: R,
    name: SnapName,
}

impl<R: CommandRunner> SnapCtl<R> {
    pub fn new(runner: R, name: SnapName) -> Self {
        Self { runner, name }
    }

    /// The underlying command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `snap <args>` and turn a non-zero exit into a [`SnapError`].
    async fn snap(
        &self,
        action: &'static str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<Output> {
        let output = match timeout {
            Some(t) => self.runner.run_with_timeout("snap", args, t).await,
            None => self.runner.run("snap", args).await,
        }
        .with_context(|| format!("snap {action} {}", self.name))?;

        if !output.status.success() {
            return Err(SnapError::CommandFailed {
                action,
                name: self.name.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(output)
    }
}

impl<R: CommandRunner> PackageManager for SnapCtl<R> {
    fn name(&self) -> &SnapName {
        &self.name
    }

    async fn is_present(&self) -> Result<bool> {
        let name = self.name.to_string();
        let output = self
            .runner
            .run("snap", &["list", &name])
            .await
            .context("snap list")?;
        Ok(output.status.success())
    }

    async fn install(&self, channel: &str) -> Result<()> {
        let name = self.name.to_string();
        if self.name.is_parallel_instance() {
            // snapd refuses instance-keyed installs unless this is enabled.
            self.snap(
                "set",
                &["set", "system", "experimental.parallel-instances=true"],
                None,
            )
            .await?;
        }
        info!("Installing snap {name} from channel {channel}");
        self.snap(
            "install",
            &["install", &name, "--channel", channel],
            Some(SNAP_INSTALL_TIMEOUT),
        )
        .await?;
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        let name = self.name.to_string();
        self.snap("remove", &["remove", &name], Some(SNAP_INSTALL_TIMEOUT))
            .await?;
        Ok(())
    }

    async fn restart(&self, services: &[&str]) -> Result<()> {
        let targets: Vec<String> = services
            .iter()
            .map(|svc| format!("{}.{svc}", self.name))
            .collect();
        let mut args = vec!["restart"];
        args.extend(targets.iter().map(String::as_str));
        debug!(?targets, "restarting snap services");
        self.snap("restart", &args, None).await?;
        Ok(())
    }

    async fn connect_interface(&self, slot_snap: &str, interface: &str) -> Result<()> {
        let plug = format!("{}:{interface}", self.name);
        let slot = format!("{slot_snap}:{interface}");
        self.snap("connect", &["connect", &plug, &slot], None).await?;
        Ok(())
    }

    async fn disconnect_interface(&self, slot_snap: &str, interface: &str) -> Result<()> {
        let plug = format!("{}:{interface}", self.name);
        let slot = format!("{slot_snap}:{interface}");
        self.snap("disconnect", &["disconnect", &plug, &slot], None)
            .await?;
        Ok(())
    }
}
