//! Error types for the IP information tool.

/// Errors raised inside tool operations before they are turned into envelopes.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The conversation payload carried no messages.
    #[error("No input messages found")]
    NoMessages,

    /// The conversation payload did not have the expected shape.
    #[error("Invalid conversation payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// The host rejected a progress notification.
    #[error("Failed to deliver status notification: {0}")]
    Notification(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
