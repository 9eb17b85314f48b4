//! `tcp-health-check`: one round of the TCP reachability monitor.
//!
//! Invoked by the agent as a script check:
//! `tcp-health-check 10.0.0.1:8301 10.0.0.2:8301 --socket-path data/socket.sock`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use crate::application::services::health_check::{CheckOptions, tcp_check};
use crate::domain::health::DEFAULT_MONITORING_SAMPLES;
use crate::infra::alert::UnixSocketAlerter;
use crate::infra::network::TokioNetworkProbe;
use crate::infra::state::JsonStateStore;

const USAGE: &str =
    "Usage: tcp-health-check <host:port> [<host:port> ...] --socket-path <path> [--monitoring-samples <n>]";

/// TCP health check with NIC-down alerting
#[derive(Parser, Debug)]
#[command(name = "tcp-health-check", version)]
pub struct ProbeArgs {
    /// Servers to probe, as host:port (IPv6 hosts in brackets)
    #[arg(value_name = "HOST:PORT")]
    pub servers: Vec<String>,

    /// Alert socket, relative to $SNAP_DATA
    #[arg(short, long)]
    pub socket_path: Option<String>,

    /// Consecutive failed rounds before alerting; 0 alerts on every failure
    #[arg(short, long, default_value_t = DEFAULT_MONITORING_SAMPLES)]
    pub monitoring_samples: u32,

    /// Failure counter file; defaults to $SNAP_DATA/tcp_health_check_state.json
    #[arg(long)]
    pub state_file: Option<PathBuf>,
}

/// Run one monitoring round.
///
/// Exits 0 whatever the reachability result, so the agent's check output
/// carries the log rather than a failing status. Exits 1 when no servers are
/// given or a server address is malformed.
///
/// # Errors
///
/// Never returns an error; failures map to the exit code.
pub async fn run(args: ProbeArgs) -> Result<ExitCode> {
    if args.servers.is_empty() {
        error!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    }

    let store = args
        .state_file
        .map_or_else(JsonStateStore::new, JsonStateStore::with_path);
    let opts = CheckOptions {
        servers: &args.servers,
        socket_path: args.socket_path.as_deref(),
        monitoring_samples: args.monitoring_samples,
    };

    match tcp_check(&TokioNetworkProbe, &store, &UnixSocketAlerter::from_env(), opts).await {
        Ok(outcome) => {
            info!(?outcome, "round complete");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("{e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}
