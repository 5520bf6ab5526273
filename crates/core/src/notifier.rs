// Progress notification capability handed in by the host

use crate::error::ToolError;
use crate::types::StatusEvent;
use anyhow::Result;
use tokio::sync::mpsc;

/// Receives status events while a request runs.
///
/// `notify` may suspend until the host has accepted the event, and may fail.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: StatusEvent) -> Result<()>;
}

/// Forwards events over a bounded channel. Suspends while the channel is
/// full and fails once the receiving side is dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::Sender<StatusEvent>,
}

impl ChannelNotifier {
    pub fn new(sender: mpsc::Sender<StatusEvent>) -> Self {
        Self { sender }
    }

    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<StatusEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), receiver)
    }
}

#[async_trait::async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, event: StatusEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| ToolError::Notification("status receiver closed".to_string()))?;
        Ok(())
    }
}

/// Writes events to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: StatusEvent) -> Result<()> {
        tracing::info!(done = event.is_done(), "{}", event.description());
        Ok(())
    }
}
