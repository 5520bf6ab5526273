// Address resolution and envelope handling for the IP information tool

pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod resolver;
pub mod tool;
pub mod types;

pub use config::ToolConfig;
pub use envelope::ErrorEnvelope;
pub use error::{ConfigError, ToolError};
pub use notifier::{ChannelNotifier, LogNotifier, Notifier};
pub use resolver::{AddressResolver, FallbackMode};
pub use tool::IpInfoTool;
pub use types::*;
