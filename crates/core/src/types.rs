// Data exchanged between the tool and its host

use serde::{Deserialize, Serialize};

use crate::envelope::ErrorEnvelope;

/// Placeholder reported for an address that could not be determined
pub const UNKNOWN_ADDRESS: &str = "Unknown";

/// Addresses of the machine running the tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub private_address: String,
    pub public_address: String,
}

impl AddressInfo {
    pub fn new(private_address: impl Into<String>, public_address: impl Into<String>) -> Self {
        Self {
            private_address: private_address.into(),
            public_address: public_address.into(),
        }
    }

    /// Both addresses unknown
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ADDRESS, UNKNOWN_ADDRESS)
    }

    pub fn is_fully_unknown(&self) -> bool {
        self.private_address == UNKNOWN_ADDRESS && self.public_address == UNKNOWN_ADDRESS
    }
}

impl Default for AddressInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Result of a successful `process_request`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    pub status: String,
    pub query: String,
    pub ip_info: AddressInfo,
}

impl SuccessEnvelope {
    pub fn new(query: impl Into<String>, ip_info: AddressInfo) -> Self {
        Self {
            status: "success".to_string(),
            query: query.into(),
            ip_info,
        }
    }
}

/// A single chat message. Keys other than `role` and `content` are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Conversation body handed to `pipe`.
///
/// Existing messages are kept as raw JSON: only the appended message is typed.
/// Keys other than `messages` are kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversationPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ConversationPayload {
    pub fn new(messages: Vec<serde_json::Value>) -> Self {
        Self {
            messages,
            extra: serde_json::Map::new(),
        }
    }

    pub fn push(&mut self, message: Message) -> Result<(), serde_json::Error> {
        self.messages.push(serde_json::to_value(message)?);
        Ok(())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Progress event sent to the host while a request is running
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StatusEvent {
    Status { description: String, done: bool },
}

impl StatusEvent {
    pub fn in_progress(description: impl Into<String>) -> Self {
        Self::Status {
            description: description.into(),
            done: false,
        }
    }

    pub fn finished(description: impl Into<String>) -> Self {
        Self::Status {
            description: description.into(),
            done: true,
        }
    }

    pub fn is_done(&self) -> bool {
        match self {
            Self::Status { done, .. } => *done,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Status { description, .. } => description,
        }
    }
}

/// Outcome of a public tool operation.
///
/// Serialized untagged: callers see either the success payload or the
/// error envelope as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    // Must stay first: untagged matching takes the first variant that fits
    Failure(ErrorEnvelope),
    Success(T),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(self) -> Option<ErrorEnvelope> {
        match self {
            Self::Success(_) => None,
            Self::Failure(envelope) => Some(envelope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_event_wire_shape() {
        let event = StatusEvent::in_progress("Retrieving IP information...");
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "status",
                "data": { "description": "Retrieving IP information...", "done": false }
            })
        );
        assert!(StatusEvent::finished("done").is_done());
    }

    #[test]
    fn test_payload_keeps_unknown_keys() {
        let body = json!({
            "model": "llama3",
            "messages": [{ "role": "user", "content": "hi", "id": 7 }]
        });

        let payload: ConversationPayload = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(payload.messages.len(), 1);
        assert_eq!(payload.messages[0]["id"], json!(7));

        assert_eq!(serde_json::to_value(&payload).unwrap(), body);
    }

    #[test]
    fn test_payload_without_messages() {
        let payload: ConversationPayload = serde_json::from_value(json!({ "chat_id": "c1" })).unwrap();
        assert!(payload.messages.is_empty());

        let payload: ConversationPayload = serde_json::from_value(json!({ "messages": null })).unwrap();
        assert!(payload.messages.is_empty());
    }

    #[test]
    fn test_payload_keeps_opaque_messages() {
        let body = json!({
            "messages": [
                { "role": "assistant", "content": null, "tool_calls": [] },
                { "role": "user", "content": [{ "type": "text", "text": "ip?" }] }
            ]
        });

        let mut payload: ConversationPayload = serde_json::from_value(body.clone()).unwrap();
        payload.push(Message::assistant("{}")).unwrap();

        assert_eq!(payload.messages[..2], body["messages"].as_array().unwrap()[..]);
        assert_eq!(payload.messages[2], json!({ "role": "assistant", "content": "{}" }));
    }

    #[test]
    fn test_failure_outcome_round_trip() {
        let error = anyhow::anyhow!("No input messages found");
        let outcome: Outcome<ConversationPayload> =
            Outcome::Failure(ErrorEnvelope::from_error(&error, "pipe", json!({ "messages": [] })));

        let value = serde_json::to_value(&outcome).unwrap();
        let decoded: Outcome<ConversationPayload> = serde_json::from_value(value).unwrap();

        assert_eq!(decoded, outcome);
    }

    #[test]
    fn test_success_outcome_round_trip() {
        let outcome = Outcome::Success(SuccessEnvelope::new("Get IP", AddressInfo::unknown()));

        let value = serde_json::to_value(&outcome).unwrap();
        let decoded: Outcome<SuccessEnvelope> = serde_json::from_value(value).unwrap();

        assert!(decoded.is_success());
        assert_eq!(decoded, outcome);
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = SuccessEnvelope::new("Get IP", AddressInfo::new("10.0.0.2", "203.0.113.9"));

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "status": "success",
                "query": "Get IP",
                "ip_info": { "private_address": "10.0.0.2", "public_address": "203.0.113.9" }
            })
        );
    }

    #[test]
    fn test_unknown_address_info() {
        let info = AddressInfo::default();
        assert!(info.is_fully_unknown());
        assert_eq!(info.private_address, "Unknown");
    }
}
