// Public address lookup against an HTTP IP-reporting service

use super::PublicAddressSource;
use crate::config::ResolverConfig;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Asks a service such as ipify for the address it sees us connecting from
#[derive(Debug, Clone)]
pub struct HttpPublicLookup {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpPublicLookup {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;
        Self::with_timeout(endpoint, config.timeout(), &config.user_agent)
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait::async_trait]
impl PublicAddressSource for HttpPublicLookup {
    async fn public_address(&self) -> Result<Option<String>> {
        tracing::debug!(url = %self.endpoint, "Fetching public address");

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .context("HTTP request failed")?
            .error_for_status()
            .context("IP service returned an error status")?;

        let body: Value = response
            .json()
            .await
            .context("Failed to parse IP service response")?;

        extract_ip(&body)
    }
}

/// Pull the `ip` field out of a service response. A missing field is not an error.
fn extract_ip(body: &Value) -> Result<Option<String>> {
    let object = body
        .as_object()
        .ok_or_else(|| anyhow!("Expected a JSON object from IP service, got: {}", body))?;

    Ok(match object.get("ip") {
        None | Some(Value::Null) => None,
        Some(Value::String(ip)) => Some(ip.clone()),
        Some(other) => Some(other.to_string()),
    })
}
