//! Host identity: implements `HostIdentity` from the kernel hostname.

use anyhow::{Context, Result};

use crate::application::ports::HostIdentity;

const KERNEL_HOSTNAME: &str = "/proc/sys/kernel/hostname";

pub struct SystemHost;

impl HostIdentity for SystemHost {
    fn hostname(&self) -> Result<String> {
        let from_kernel = std::fs::read_to_string(KERNEL_HOSTNAME)
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty());
        if let Some(name) = from_kernel {
            return Ok(name);
        }
        std::env::var("HOSTNAME")
            .ok()
            .filter(|s| !s.is_empty())
            .context("cannot determine hostname")
    }
}
