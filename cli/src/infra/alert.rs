//! Alert infrastructure: implements `AlertTransport` over a Unix stream socket.
//!
//! The message is written in a single unframed write and the reply is one read
//! of at most 1024 bytes. No timeout is applied to the socket: a companion that
//! accepts but never answers stalls the round.

use std::path::PathBuf;

use anyhow::{Context, Result};
use consul_client_common::AlertMessage;
use consul_client_common::protocol::MAX_RESPONSE_BYTES;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, error, info};

use crate::application::ports::AlertTransport;
use crate::domain::health::{AlertOutcome, interpret_response};

/// Runtime data directory the socket path is relative to.
pub const SNAP_DATA_ENV: &str = "SNAP_DATA";

/// Production alert transport.
pub struct UnixSocketAlerter {
    data_dir: Option<PathBuf>,
}

impl UnixSocketAlerter {
    /// Resolve socket paths against `$SNAP_DATA`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var_os(SNAP_DATA_ENV).map(PathBuf::from),
        }
    }

    /// Resolve socket paths against an explicit directory.
    #[must_use]
    pub fn with_data_dir(dir: PathBuf) -> Self {
        Self {
            data_dir: Some(dir),
        }
    }

    async fn deliver(&self, socket_path: &str) -> Result<Vec<u8>> {
        let data_dir = self
            .data_dir
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("{SNAP_DATA_ENV} is not set"))?;
        let path = data_dir.join(socket_path);
        info!("Sending nic down alert signal via Unix socket at {}...", path.display());

        let message =
            serde_json::to_string(&AlertMessage::nic_down()).context("serializing alert")?;
        debug!("Sending message: {message}");

        let mut stream = UnixStream::connect(&path)
            .await
            .with_context(|| format!("Socket error: connecting to {}", path.display()))?;
        stream
            .write_all(message.as_bytes())
            .await
            .context("Socket error: sending alert")?;

        let mut buf = vec![0u8; MAX_RESPONSE_BYTES];
        let n = stream
            .read(&mut buf)
            .await
            .context("Socket error: reading response")?;
        buf.truncate(n);
        Ok(buf)
    }
}

impl AlertTransport for UnixSocketAlerter {
    async fn send_nic_down(&self, socket_path: &str) -> AlertOutcome {
        let outcome = match self.deliver(socket_path).await {
            Ok(raw) => interpret_response(&raw),
            Err(e) => AlertOutcome::Failed {
                reason: format!("{e:#}"),
            },
        };
        match &outcome {
            AlertOutcome::Acknowledged { response } => info!("Response: {response}"),
            AlertOutcome::Rejected { message } => {
                error!("Error from server: {}", message.as_deref().unwrap_or_default());
            }
            AlertOutcome::Failed { reason } => error!("Error sending alert signal: {reason}"),
        }
        outcome
    }
}
