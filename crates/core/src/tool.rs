// The IP information tool: request processing and message injection

use crate::config::ToolConfig;
use crate::envelope::ErrorEnvelope;
use crate::error::ToolError;
use crate::notifier::Notifier;
use crate::resolver::AddressResolver;
use crate::types::{ConversationPayload, Message, Outcome, StatusEvent, SuccessEnvelope};
use anyhow::Result;
use serde_json::{json, Value};

pub const PROCESS_REQUEST: &str = "process_request";
pub const PIPE: &str = "pipe";

const STARTED_DESCRIPTION: &str = "Retrieving IP information...";
const FINISHED_DESCRIPTION: &str = "IP information retrieved";

/// Entry points exposed to the host. Every call returns plain data; errors
/// come back as an [`ErrorEnvelope`] in place of the result.
#[derive(Clone)]
pub struct IpInfoTool {
    resolver: AddressResolver,
}

impl IpInfoTool {
    pub fn new(resolver: AddressResolver) -> Self {
        Self { resolver }
    }

    pub fn from_config(config: &ToolConfig) -> Result<Self> {
        Ok(Self::new(AddressResolver::from_config(&config.resolver)?))
    }

    pub fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    /// Resolve the machine's addresses for `query`, announcing progress
    /// through `notifier` when one is given.
    pub async fn process_request(
        &self,
        query: &str,
        notifier: Option<&dyn Notifier>,
    ) -> Outcome<SuccessEnvelope> {
        match self.run_request(query, notifier).await {
            Ok(envelope) => Outcome::Success(envelope),
            Err(e) => Outcome::Failure(ErrorEnvelope::from_error(
                &e,
                PROCESS_REQUEST,
                json!({ "query": query }),
            )),
        }
    }

    async fn run_request(
        &self,
        query: &str,
        notifier: Option<&dyn Notifier>,
    ) -> Result<SuccessEnvelope> {
        if let Some(notifier) = notifier {
            notifier
                .notify(StatusEvent::in_progress(STARTED_DESCRIPTION))
                .await?;
        }

        let ip_info = self.resolver.resolve().await;

        if let Some(notifier) = notifier {
            notifier
                .notify(StatusEvent::finished(FINISHED_DESCRIPTION))
                .await?;
        }

        Ok(SuccessEnvelope::new(query, ip_info))
    }

    /// Append the machine's addresses to a conversation as an assistant
    /// message. `body` itself is left untouched.
    pub async fn pipe(&self, body: &Value) -> Outcome<ConversationPayload> {
        match self.run_pipe(body).await {
            Ok(payload) => Outcome::Success(payload),
            Err(e) => Outcome::Failure(ErrorEnvelope::from_error(&e, PIPE, body.clone())),
        }
    }

    async fn run_pipe(&self, body: &Value) -> Result<ConversationPayload> {
        let mut payload: ConversationPayload =
            serde_json::from_value(body.clone()).map_err(ToolError::InvalidPayload)?;

        if payload.messages.is_empty() {
            return Err(ToolError::NoMessages.into());
        }

        let ip_info = self.resolver.resolve().await;
        let content = serde_json::to_string(&json!({ "ip_info": ip_info }))
            .map_err(ToolError::from)?;
        payload
            .push(Message::assistant(content))
            .map_err(ToolError::from)?;

        tracing::debug!(messages = payload.messages.len(), "Injected IP information");
        Ok(payload)
    }
}
