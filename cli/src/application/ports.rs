//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use consul_client_common::FailureState;

use crate::domain::{
    AlertOutcome, ClientConfig, ClusterMembership, NotifyEndpoint, SnapName, Target, UnitStatus,
};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Agent Package Port ────────────────────────────────────────────────────────

/// Handle on the installed consul agent package, created once per cycle.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    /// Package name, including the parallel-instance key.
    fn name(&self) -> &SnapName;
    /// Whether the package is installed.
    async fn is_present(&self) -> Result<bool>;
    /// Install the package from `channel`.
    async fn install(&self, channel: &str) -> Result<()>;
    /// Remove the package.
    async fn remove(&self) -> Result<()>;
    /// Restart the named package services.
    async fn restart(&self, services: &[&str]) -> Result<()>;
    /// Connect this package's `interface` plug to `slot_snap`.
    async fn connect_interface(&self, slot_snap: &str, interface: &str) -> Result<()>;
    /// Disconnect this package's `interface` plug from `slot_snap`.
    async fn disconnect_interface(&self, slot_snap: &str, interface: &str) -> Result<()>;
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// Read/write primitive for the persisted agent configuration.
#[allow(async_fn_in_trait)]
pub trait ConfigFile {
    /// Read the file, returning `None` if it does not exist.
    async fn read(&self, path: &Path) -> Result<Option<String>>;
    /// Write `text`, creating parent directories as needed.
    async fn write(&self, path: &Path, text: &str) -> Result<()>;
}

/// Places the probe program where the agent's script check can execute it.
#[allow(async_fn_in_trait)]
pub trait ProbeArtifactInstaller {
    /// Copy the probe to `dest` unless something is already there.
    ///
    /// Returns `true` if a copy was made.
    async fn ensure_installed(&self, dest: &Path) -> Result<bool>;
}

// ── Host and Input Ports ──────────────────────────────────────────────────────

/// Host identity used as the consul node name.
pub trait HostIdentity {
    /// The machine's hostname.
    fn hostname(&self) -> Result<String>;
}

/// Snapshot source for the two relations the agent consumes.
#[allow(async_fn_in_trait)]
pub trait RelationSource {
    /// Current cluster membership; default when the relation is absent.
    async fn cluster(&self) -> Result<ClusterMembership>;
    /// Current notify socket endpoint; default when the relation is absent.
    async fn notify(&self) -> Result<NotifyEndpoint>;
}

/// Abstracts loading of operator toggles.
pub trait ConfigStore {
    /// Load configuration, falling back to defaults when none is stored.
    fn load(&self) -> Result<ClientConfig>;
}

// ── Status Reporting Port ─────────────────────────────────────────────────────

/// Abstracts operator status reporting so services can emit status without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait StatusReporter {
    /// Publish a new unit status.
    fn set_status(&self, status: &UnitStatus);
}

// ── Reachability Ports ────────────────────────────────────────────────────────

/// Abstracts network connectivity checks so application services can be tested
/// without real network access.
#[allow(async_fn_in_trait)]
pub trait NetworkProbe {
    /// Open and immediately close a TCP connection to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the target is unreachable.
    async fn check_tcp_connectivity(&self, target: &Target, timeout: Duration) -> Result<()>;
}

/// Persistence for the probe's consecutive-failure counter.
#[allow(async_fn_in_trait)]
pub trait FailureStateStore {
    /// Load the counter, returning `None` if nothing is stored yet.
    async fn load(&self) -> Result<Option<FailureState>>;
    /// Persist the counter.
    async fn save(&self, state: FailureState) -> Result<()>;
}

/// Delivers the NIC-down alert to the companion process.
#[allow(async_fn_in_trait)]
pub trait AlertTransport {
    /// Send one alert. Never fails: problems are folded into the outcome.
    async fn send_nic_down(&self, socket_path: &str) -> AlertOutcome;
}
