//! Network infrastructure: implements `NetworkProbe` with tokio sockets.

use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpStream;

use crate::application::ports::NetworkProbe;
use crate::domain::addresses::Target;

/// Production implementation that performs real TCP connects.
pub struct TokioNetworkProbe;

impl NetworkProbe for TokioNetworkProbe {
    async fn check_tcp_connectivity(&self, target: &Target, timeout: Duration) -> Result<()> {
        let connect = TcpStream::connect((target.host.as_str(), target.port));
        match tokio::time::timeout(timeout, connect).await {
            // Dropping the stream closes the connection right away.
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => anyhow::bail!("timed out after {}s", timeout.as_secs()),
        }
    }
}
