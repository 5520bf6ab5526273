// Private address lookup through the operating system resolver

use super::LocalAddressSource;
use anyhow::{anyhow, Context, Result};
use std::net::{IpAddr, SocketAddr};

/// Resolves the current hostname to an address, the way `gethostbyname`
/// would: IPv4 preferred.
#[derive(Debug, Clone, Default)]
pub struct HostnameLookup;

impl HostnameLookup {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl LocalAddressSource for HostnameLookup {
    async fn private_address(&self) -> Result<IpAddr> {
        let hostname = current_hostname()?;
        tracing::debug!(hostname = %hostname, "Resolving private address");
        resolve_host(&hostname).await
    }
}

#[cfg(unix)]
pub fn current_hostname() -> Result<String> {
    let name = nix::unistd::gethostname().context("Failed to read hostname")?;
    name.into_string()
        .map_err(|raw| anyhow!("Hostname is not valid UTF-8: {:?}", raw))
}

#[cfg(not(unix))]
pub fn current_hostname() -> Result<String> {
    std::env::var("COMPUTERNAME").context("Failed to read hostname from COMPUTERNAME")
}

/// Resolve `hostname` and pick one address
pub async fn resolve_host(hostname: &str) -> Result<IpAddr> {
    // lookup_host needs a port; it is ignored
    let host = format!("{hostname}:0");
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&host)
        .await
        .with_context(|| format!("Failed to resolve hostname {}", hostname))?
        .collect();

    pick_address(&addrs).ok_or_else(|| anyhow!("No addresses found for {}", hostname))
}

fn pick_address(addrs: &[SocketAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .map(SocketAddr::ip)
        .find(IpAddr::is_ipv4)
        .or_else(|| addrs.first().map(SocketAddr::ip))
}
