//! Application service — one round of the TCP reachability monitor.
//!
//! Probes every server, updates the persisted failure counter and fires the
//! NIC-down alert once the counter reaches the threshold. Scheduling belongs
//! to the caller; each call is one round.

use anyhow::Result;
use consul_client_common::FailureState;
use tracing::{error, info, warn};

use crate::application::ports::{AlertTransport, FailureStateStore, NetworkProbe};
use crate::domain::addresses::parse_targets;
use crate::domain::health::{AlertOutcome, RoundAction, TCP_CONNECT_TIMEOUT, next_action};

/// Inputs for one round.
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions<'a> {
    /// `host:port` servers to probe.
    pub servers: &'a [String],
    /// Alert socket, relative to the runtime data directory.
    pub socket_path: Option<&'a str>,
    /// Consecutive failed rounds required before alerting.
    pub monitoring_samples: u32,
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// All servers reachable, no prior failures.
    Healthy,
    /// All servers reachable, counter reset from `previous`.
    Recovered { previous: u32 },
    /// Some server unreachable, counter now `count`, below the threshold.
    Degraded { count: u32 },
    /// Threshold reached and the alert was delivered; counter reset.
    AlertSent { outcome: AlertOutcome },
    /// Threshold reached but the alert did not get through; counter kept.
    AlertFailed { count: u32, outcome: AlertOutcome },
    /// Threshold reached with no socket to alert through; counter kept.
    AlertUnconfigured { count: u32 },
}

/// Run one monitoring round.
///
/// Every server is probed even after a failure, so each one gets a log line.
///
/// # Errors
///
/// Returns an error only when a server address is malformed. In that case
/// nothing is probed and the persisted counter is left untouched.
pub async fn tcp_check(
    probe: &impl NetworkProbe,
    store: &impl FailureStateStore,
    alerter: &impl AlertTransport,
    opts: CheckOptions<'_>,
) -> Result<CheckOutcome> {
    let targets = parse_targets(opts.servers)?;

    let mut all_reachable = true;
    for target in &targets {
        match probe.check_tcp_connectivity(target, TCP_CONNECT_TIMEOUT).await {
            Ok(()) => info!("TCP check successful for {target}"),
            Err(e) => {
                warn!("TCP check failed for {target}: {e:#}");
                all_reachable = false;
            }
        }
    }

    let prior = load_failure_count(store).await;
    let threshold = opts.monitoring_samples;

    match next_action(prior, all_reachable, threshold) {
        RoundAction::Healthy => {
            info!("All servers reachable. No alert triggered.");
            Ok(CheckOutcome::Healthy)
        }
        RoundAction::Recovered { previous } => {
            info!("All servers reachable. Resetting failure count.");
            save_failure_count(store, 0).await;
            Ok(CheckOutcome::Recovered { previous })
        }
        RoundAction::Degraded { count } => {
            info!("Health check failed. Failure count: {count}/{threshold}");
            save_failure_count(store, count).await;
            info!("Failure threshold not reached yet ({count}/{threshold})");
            Ok(CheckOutcome::Degraded { count })
        }
        RoundAction::Alert { count } => {
            info!("Health check failed. Failure count: {count}/{threshold}");
            save_failure_count(store, count).await;
            let Some(socket_path) = opts.socket_path.filter(|p| !p.is_empty()) else {
                error!("Cannot send alert: socket_path is required but was not provided");
                return Ok(CheckOutcome::AlertUnconfigured { count });
            };
            let outcome = alerter.send_nic_down(socket_path).await;
            if outcome.is_delivered() {
                save_failure_count(store, 0).await;
                Ok(CheckOutcome::AlertSent { outcome })
            } else {
                warn!("NIC down alert not delivered, keeping failure count at {count}");
                Ok(CheckOutcome::AlertFailed { count, outcome })
            }
        }
    }
}

async fn load_failure_count(store: &impl FailureStateStore) -> u32 {
    match store.load().await {
        Ok(state) => state.unwrap_or_default().failure_count,
        Err(e) => {
            warn!("Failed to read state file: {e:#}");
            0
        }
    }
}

async fn save_failure_count(store: &impl FailureStateStore, count: u32) {
    if let Err(e) = store.save(FailureState::new(count)).await {
        warn!("Failed to write state file: {e:#}");
    }
}
