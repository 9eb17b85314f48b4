//! Application service — trigger dispatch for the consul client agent.
//!
//! Each trigger maps to exactly one handler. Handlers share nothing but the
//! relation snapshots and toggles they read at the start of the cycle, and
//! publish their result through the `StatusReporter` port.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::application::ports::{
    ConfigFile, HostIdentity, PackageManager, ProbeArtifactInstaller, RelationSource,
    StatusReporter,
};
use crate::application::services::config_builder::build_config;
use crate::application::services::reconciler::reconcile;
use crate::domain::config::ClientConfig;
use crate::domain::consul_config::ConfigInputs;
use crate::domain::relation::NotifyEndpoint;
use crate::domain::snap::{CONSUL_SERVICE, CONSUL_SOCKET_INTERFACE, SnapPaths};
use crate::domain::status::UnitStatus;

/// Named events the agent manager reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Install,
    Start,
    Stop,
    Remove,
    Upgrade,
    ConfigChanged,
    /// Cluster membership relation data changed.
    ClusterChanged,
    /// Notify socket relation data changed (socket published or withdrawn).
    NotifyChanged,
}

/// Collaborators for one reconciliation cycle.
pub struct AgentManager<'a, S, F, R, H, P> {
    pub snap: &'a S,
    pub files: &'a F,
    pub relations: &'a R,
    pub host: &'a H,
    pub reporter: &'a P,
    pub settings: &'a ClientConfig,
    pub paths: &'a SnapPaths,
    /// Address from the agent's network binding, if one is bound.
    pub bind_address: Option<&'a str>,
}

impl<S, F, R, H, P> AgentManager<'_, S, F, R, H, P>
where
    S: PackageManager,
    F: ConfigFile + ProbeArtifactInstaller,
    R: RelationSource,
    H: HostIdentity,
    P: StatusReporter,
{
    /// Run the handler for `trigger`.
    ///
    /// Blocked conditions (missing relation, failed install/restart/remove)
    /// are reported as status, not returned as errors.
    ///
    /// # Errors
    ///
    /// Returns an error when the cycle cannot complete: unreadable relation
    /// data, host identity lookup failure, probe placement failure, or a
    /// configuration write failure.
    pub async fn handle(&self, trigger: Trigger) -> Result<()> {
        debug!(?trigger, snap = %self.snap.name(), "handling trigger");
        match trigger {
            Trigger::Install => self.on_install().await,
            Trigger::Start => {
                self.set(UnitStatus::Maintenance(format!("Starting {} snap", self.snap.name())));
                self.configure().await
            }
            Trigger::Stop => {
                self.set(UnitStatus::Maintenance(format!("Stopping {} snap", self.snap.name())));
                self.configure().await
            }
            Trigger::Remove => self.on_remove().await,
            Trigger::Upgrade | Trigger::ConfigChanged => {
                if self.ensure_snap_present().await? {
                    self.configure().await?;
                }
                Ok(())
            }
            Trigger::ClusterChanged => self.configure().await,
            Trigger::NotifyChanged => self.on_notify_changed().await,
        }
    }

    fn set(&self, status: UnitStatus) {
        self.reporter.set_status(&status);
    }

    async fn on_install(&self) -> Result<()> {
        self.ensure_snap_present().await?;
        Ok(())
    }

    async fn on_remove(&self) -> Result<()> {
        let name = self.snap.name();
        self.set(UnitStatus::Maintenance(format!("Uninstalling {name} snap")));

        let notify = self.relations.notify().await?;
        if let Some(slot) = notify.snap_name.as_deref() {
            match self.snap.disconnect_interface(slot, CONSUL_SOCKET_INTERFACE).await {
                Ok(()) => info!("Disconnected snap interface {name}:{CONSUL_SOCKET_INTERFACE} -X- {slot}"),
                Err(e) => warn!("Failed to disconnect snap interfaces: {e:#}"),
            }
        }

        debug!("Uninstalling snap {name}");
        if let Err(e) = self.snap.remove().await {
            info!("Failed to uninstall {name}: {e:#}");
            self.set(UnitStatus::remove_failed(name));
        }
        Ok(())
    }

    async fn on_notify_changed(&self) -> Result<()> {
        let notify = self.relations.notify().await?;
        if notify.is_ready() {
            info!(
                snap = notify.snap_name.as_deref().unwrap_or_default(),
                socket = notify.socket_path.as_deref().unwrap_or_default(),
                "Socket information available for sending NIC down alert"
            );
            self.connect_socket_interface(&notify).await;
        } else {
            info!("Socket information gone, disabling TCP health check");
        }
        self.configure().await
    }

    /// Install the package if missing. Returns `false` (with a blocked status)
    /// if installation failed.
    async fn ensure_snap_present(&self) -> Result<bool> {
        let name = self.snap.name();
        match self.install_if_missing().await {
            Ok(true) => {
                // Interfaces only need connecting right after a fresh install.
                let notify = self.relations.notify().await?;
                self.connect_socket_interface(&notify).await;
                Ok(true)
            }
            Ok(false) => Ok(true),
            Err(e) => {
                info!("Exception occurred while installing snap {name}: {e:#}");
                self.set(UnitStatus::install_failed(name));
                Ok(false)
            }
        }
    }

    async fn install_if_missing(&self) -> Result<bool> {
        if self.snap.is_present().await? {
            return Ok(false);
        }
        self.snap.install(&self.settings.snap_channel).await?;
        Ok(true)
    }

    async fn connect_socket_interface(&self, notify: &NotifyEndpoint) {
        let Some(slot) = notify.snap_name.as_deref() else {
            debug!("No companion snap published, skipping {CONSUL_SOCKET_INTERFACE} connection");
            return;
        };
        let name = self.snap.name();
        match self.snap.connect_interface(slot, CONSUL_SOCKET_INTERFACE).await {
            Ok(()) => info!(
                "Successfully connected snap interfaces: {name}:{CONSUL_SOCKET_INTERFACE} -> {slot}:{CONSUL_SOCKET_INTERFACE}"
            ),
            Err(e) => warn!("Failed to connect snap interfaces: {e:#}"),
        }
    }

    /// Gate on the cluster relation, rebuild the config, persist it if it
    /// changed and restart the agent.
    async fn configure(&self) -> Result<()> {
        let cluster = self.relations.cluster().await?;
        let Some((datacenter, join)) = cluster.required() else {
            debug!("Waiting for consul-cluster relation to be ready");
            self.set(UnitStatus::cluster_missing());
            return Ok(());
        };

        let notify = self.relations.notify().await?;
        let node_name = self.host.hostname()?;
        let probe = self.paths.probe_artifact();
        let inputs = ConfigInputs {
            bind_address: self.bind_address,
            datacenter,
            node_name: &node_name,
            tcp_check: self.settings.enable_health_check && notify.is_ready(),
            join_addresses: join,
            healthcheck_addresses: cluster.healthcheck_endpoints.as_deref(),
            ports: self.settings.ports(),
            socket_path: notify.socket_path.as_deref(),
            probe_command: &probe,
        };

        let built = build_config(self.files, &inputs).await?;
        let changed = reconcile(self.files, &self.paths.config_file(), &built.config).await?;

        if changed {
            let name = self.snap.name();
            if let Err(e) = self.snap.restart(&[CONSUL_SERVICE]).await {
                info!("Failed to restart {name}: {e:#}");
                self.set(UnitStatus::restart_failed(name));
                return Ok(());
            }
            info!("Restarted {name}.{CONSUL_SERVICE}");
        }

        self.set(UnitStatus::Active);
        Ok(())
    }
}
