// Tool configuration: TOML file with environment overrides

use crate::error::ConfigError;
use crate::resolver::FallbackMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const ENV_ENDPOINT: &str = "IPINFO_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "IPINFO_TIMEOUT_SECS";
pub const ENV_FALLBACK: &str = "IPINFO_FALLBACK";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Public IP-reporting service, must answer with `{"ip": "..."}`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub fallback: FallbackMode,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("ipinfo/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            fallback: FallbackMode::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidValue {
                key: "resolver.endpoint".to_string(),
                message: format!("only HTTP/HTTPS endpoints are supported, got: {}", url.scheme()),
            });
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Emit status events while a request runs
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ToolConfig {
    /// Load from `config_path` if it exists, otherwise use defaults, then
    /// apply environment overrides.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = if config_path.exists() {
            let content =
                std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                    path: config_path.display().to_string(),
                    source,
                })?;
            toml::from_str(&content)?
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.resolver.endpoint = endpoint;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.resolver.timeout_secs =
                timeout.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS.to_string(),
                    message: format!("expected a number of seconds, got {:?}", timeout),
                })?;
        }

        if let Some(fallback) = lookup(ENV_FALLBACK) {
            self.resolver.fallback = fallback.parse()?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.endpoint_url()?;

        if self.resolver.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "resolver.timeout_secs".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();

        assert_eq!(config.resolver.endpoint, "https://api.ipify.org?format=json");
        assert_eq!(config.resolver.timeout(), Duration::from_secs(5));
        assert_eq!(config.resolver.fallback, FallbackMode::Independent);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.notify.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolConfig::load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.resolver.timeout_secs, 5);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[resolver]
endpoint = "http://127.0.0.1:9000/ip"
fallback = "bundled"

[logging]
format = "json"

[notify]
enabled = false
"#
        )
        .unwrap();

        let config = ToolConfig::load(file.path()).unwrap();

        assert_eq!(config.resolver.endpoint, "http://127.0.0.1:9000/ip");
        assert_eq!(config.resolver.fallback, FallbackMode::Bundled);
        assert_eq!(config.resolver.timeout_secs, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "info");
        assert!(!config.notify.enabled);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[resolver\ntimeout_secs = ").unwrap();

        assert!(matches!(ToolConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_ENDPOINT, "https://ip.example.net/json"),
            (ENV_TIMEOUT_SECS, " 12 "),
            (ENV_FALLBACK, "bundled"),
        ]);

        let mut config = ToolConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.resolver.endpoint, "https://ip.example.net/json");
        assert_eq!(config.resolver.timeout_secs, 12);
        assert_eq!(config.resolver.fallback, FallbackMode::Bundled);
    }

    #[test]
    fn test_env_override_rejects_bad_timeout() {
        let mut config = ToolConfig::default();
        let result = config.apply_overrides(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ToolConfig::default();
        config.resolver.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ToolConfig::default();
        config.resolver.endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidEndpoint(_))));

        let mut config = ToolConfig::default();
        config.resolver.endpoint = "ftp://example.com/ip".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }
}
