//! Consul client configuration document and its pure builder.
//!
//! The builder never touches the filesystem. Placing the probe artifact that
//! the health-check service invokes is the caller's job (see
//! `application::services::config_builder`).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::addresses::select_addresses;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const SERVER_RPC_PORT: i32 = 8300;
/// Port value that disables a consul listener.
pub const PORT_DISABLED: i32 = -1;

pub const HEALTH_CHECK_SERVICE_NAME: &str = "tcp-health-check";
pub const HEALTH_CHECK_ID: &str = "tcp-check";
pub const HEALTH_CHECK_NAME: &str = "TCP Health Check";
pub const HEALTH_CHECK_INTERVAL: &str = "10s";
pub const HEALTH_CHECK_TIMEOUT: &str = "5s";

// ── Port set ─────────────────────────────────────────────────────────────────

/// Every port assignment consul knows about.
///
/// `-1` disables a listener; `0` leaves a sidecar/expose range unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSet {
    pub dns: i32,
    pub http: i32,
    pub https: i32,
    pub grpc: i32,
    pub grpc_tls: i32,
    pub serf_lan: i32,
    pub serf_wan: i32,
    pub server: i32,
    pub sidecar_min_port: i32,
    pub sidecar_max_port: i32,
    pub expose_min_port: i32,
    pub expose_max_port: i32,
}

impl Default for PortSet {
    fn default() -> Self {
        Self {
            dns: 8600,
            http: 8500,
            https: PORT_DISABLED,
            grpc: PORT_DISABLED,
            grpc_tls: PORT_DISABLED,
            serf_lan: 8301,
            serf_wan: 8302,
            server: SERVER_RPC_PORT,
            sidecar_min_port: 21000,
            sidecar_max_port: 21255,
            expose_min_port: 21500,
            expose_max_port: 21755,
        }
    }
}

impl PortSet {
    /// Ports for a client agent: only LAN gossip and server RPC are enabled.
    ///
    /// Service mesh, UI, DNS, gRPC and WAN gossip are unsupported.
    #[must_use]
    pub fn client(serf_lan: i32) -> Self {
        Self {
            dns: PORT_DISABLED,
            http: PORT_DISABLED,
            https: PORT_DISABLED,
            grpc: PORT_DISABLED,
            grpc_tls: PORT_DISABLED,
            serf_lan,
            serf_wan: PORT_DISABLED,
            server: SERVER_RPC_PORT,
            sidecar_min_port: 0,
            sidecar_max_port: 0,
            expose_min_port: 0,
            expose_max_port: 0,
        }
    }
}

/// The `ports` object written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMap {
    pub dns: i32,
    pub http: i32,
    pub https: i32,
    pub grpc: i32,
    pub grpc_tls: i32,
    pub serf_lan: i32,
    pub serf_wan: i32,
    pub server: i32,
}

impl From<&PortSet> for PortMap {
    fn from(p: &PortSet) -> Self {
        Self {
            dns: p.dns,
            http: p.http,
            https: p.https,
            grpc: p.grpc,
            grpc_tls: p.grpc_tls,
            serf_lan: p.serf_lan,
            serf_wan: p.serf_wan,
            server: p.server,
        }
    }
}

// ── Document ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefinition {
    pub id: String,
    pub name: String,
    pub args: Vec<String>,
    pub interval: String,
    pub timeout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub name: String,
    pub check: CheckDefinition,
}

/// Client agent configuration as consumed by consul (`client.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsulConfig {
    pub bind_addr: String,
    pub datacenter: String,
    pub node_name: String,
    pub ports: PortMap,
    pub retry_join: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_script_checks: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceDefinition>,
}

impl ConsulConfig {
    /// Render the document as it is persisted: pretty JSON, two-space indent.
    ///
    /// Field order is fixed by the struct, so equal documents render to
    /// identical text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing consul config")
    }

    /// The TCP health-check service, if configured.
    #[must_use]
    pub fn health_check(&self) -> Option<&ServiceDefinition> {
        self.services
            .iter()
            .find(|s| s.name == HEALTH_CHECK_SERVICE_NAME)
    }
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Everything the builder needs for one reconciliation cycle.
#[derive(Debug, Clone)]
pub struct ConfigInputs<'a> {
    /// Address from the network binding; wildcard when absent.
    pub bind_address: Option<&'a str>,
    pub datacenter: &'a str,
    pub node_name: &'a str,
    /// Health-check toggle, already combined with socket readiness.
    pub tcp_check: bool,
    pub join_addresses: &'a [String],
    pub healthcheck_addresses: Option<&'a [String]>,
    pub ports: PortSet,
    pub socket_path: Option<&'a str>,
    /// Location of the probe artifact the health check executes.
    pub probe_command: &'a Path,
}

impl ConfigInputs<'_> {
    /// Health checking needs both the toggle and a known socket path.
    #[must_use]
    pub fn health_check_active(&self) -> bool {
        self.tcp_check && self.socket_path.is_some_and(|p| !p.is_empty())
    }

    /// Addresses the probe will monitor.
    #[must_use]
    pub fn check_addresses(&self) -> &[String] {
        select_addresses(self.join_addresses, self.healthcheck_addresses)
    }

    /// Build the configuration document.
    #[must_use]
    pub fn build(&self) -> ConsulConfig {
        let mut config = ConsulConfig {
            bind_addr: self
                .bind_address
                .unwrap_or(DEFAULT_BIND_ADDRESS)
                .to_string(),
            datacenter: self.datacenter.to_string(),
            node_name: self.node_name.to_string(),
            ports: PortMap::from(&self.ports),
            retry_join: self.join_addresses.to_vec(),
            enable_script_checks: None,
            services: Vec::new(),
        };

        if let (true, Some(socket_path)) = (self.health_check_active(), self.socket_path) {
            config.enable_script_checks = Some(true);
            config.services.push(health_check_service(
                self.probe_command,
                self.check_addresses(),
                socket_path,
            ));
        }
        config
    }
}

fn health_check_service(probe: &Path, addresses: &[String], socket_path: &str) -> ServiceDefinition {
    let mut args = Vec::with_capacity(addresses.len() + 3);
    args.push(probe.display().to_string());
    args.extend(addresses.iter().cloned());
    args.push("--socket-path".to_string());
    args.push(socket_path.to_string());

    ServiceDefinition {
        name: HEALTH_CHECK_SERVICE_NAME.to_string(),
        check: CheckDefinition {
            id: HEALTH_CHECK_ID.to_string(),
            name: HEALTH_CHECK_NAME.to_string(),
            args,
            interval: HEALTH_CHECK_INTERVAL.to_string(),
            timeout: HEALTH_CHECK_TIMEOUT.to_string(),
        },
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
