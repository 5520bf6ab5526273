// Address resolver: private address via hostname lookup, public address via HTTP

mod local;
mod public;

pub use local::{current_hostname, resolve_host, HostnameLookup};
pub use public::HttpPublicLookup;

use crate::config::ResolverConfig;
use crate::error::ConfigError;
use crate::types::{AddressInfo, UNKNOWN_ADDRESS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Source of the machine's private address
#[async_trait::async_trait]
pub trait LocalAddressSource: Send + Sync {
    async fn private_address(&self) -> Result<IpAddr>;
}

/// Source of the machine's internet-facing address
#[async_trait::async_trait]
pub trait PublicAddressSource: Send + Sync {
    /// `Ok(None)` when the service answered but reported no address
    async fn public_address(&self) -> Result<Option<String>>;
}

/// How a failed lookup affects the other one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Each address degrades to "Unknown" on its own
    #[default]
    Independent,
    /// Any failure reports both addresses as "Unknown"; a failed private
    /// lookup skips the public one
    Bundled,
}

impl FromStr for FallbackMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(Self::Independent),
            "bundled" => Ok(Self::Bundled),
            other => Err(ConfigError::InvalidValue {
                key: "resolver.fallback".to_string(),
                message: format!("unknown fallback mode {:?}, expected independent or bundled", other),
            }),
        }
    }
}

/// Determines the local and public addresses of the running machine.
///
/// Never fails: lookups that go wrong are logged and reported as
/// [`UNKNOWN_ADDRESS`].
#[derive(Clone)]
pub struct AddressResolver {
    local: Arc<dyn LocalAddressSource>,
    public: Arc<dyn PublicAddressSource>,
    fallback: FallbackMode,
}

impl AddressResolver {
    pub fn new(
        local: Arc<dyn LocalAddressSource>,
        public: Arc<dyn PublicAddressSource>,
        fallback: FallbackMode,
    ) -> Self {
        Self {
            local,
            public,
            fallback,
        }
    }

    /// Resolver backed by the OS resolver and the configured HTTP service
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let public = HttpPublicLookup::new(config)?;
        Ok(Self::new(
            Arc::new(HostnameLookup::new()),
            Arc::new(public),
            config.fallback,
        ))
    }

    pub async fn resolve(&self) -> AddressInfo {
        match self.fallback {
            FallbackMode::Independent => self.resolve_independent().await,
            FallbackMode::Bundled => match self.resolve_bundled().await {
                Ok(info) => info,
                Err(e) => {
                    tracing::warn!(error = %format!("{:#}", e), "IP retrieval failed");
                    AddressInfo::unknown()
                }
            },
        }
    }

    async fn resolve_independent(&self) -> AddressInfo {
        let private_address = match self.local.private_address().await {
            Ok(ip) => ip.to_string(),
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Private address lookup failed");
                UNKNOWN_ADDRESS.to_string()
            }
        };

        let public_address = match self.public.public_address().await {
            Ok(Some(ip)) => ip,
            Ok(None) => UNKNOWN_ADDRESS.to_string(),
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Public address lookup failed");
                UNKNOWN_ADDRESS.to_string()
            }
        };

        AddressInfo::new(private_address, public_address)
    }

    async fn resolve_bundled(&self) -> Result<AddressInfo> {
        let private_address = self
            .local
            .private_address()
            .await
            .context("Private address lookup failed")?;

        let public_address = self
            .public
            .public_address()
            .await
            .context("Public address lookup failed")?
            .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());

        Ok(AddressInfo::new(private_address.to_string(), public_address))
    }
}
