//! Notification Sinks
//!
//! Destinations for assembled notification groups:
//! - [`JsonLinesSink`]: one JSON array per post, for a downstream notifier
//! - [`RenderedLogSink`]: rendered notification text through the log

use async_trait::async_trait;
use notification_assembler::{
    NotificationConversation, NotificationRenderer, NotificationSink, NotifyError, Result,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Writes each post as a single line of JSON
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[cfg(test)]
    pub async fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> NotificationSink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn post(&self, conversations: Vec<NotificationConversation>) -> Result<()> {
        let mut line = serde_json::to_vec(&conversations)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await.map_err(write_error)?;
        writer.flush().await.map_err(write_error)?;

        debug!("Wrote {} notification groups", conversations.len());
        Ok(())
    }
}

/// A closed reader downstream ends the sink for good
fn write_error(e: std::io::Error) -> NotifyError {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe => NotifyError::SinkUnavailable(e.to_string()),
        _ => NotifyError::Io(e),
    }
}

/// Renders each group and logs it
pub struct RenderedLogSink {
    renderer: NotificationRenderer,
}

impl RenderedLogSink {
    pub fn new(renderer: NotificationRenderer) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl NotificationSink for RenderedLogSink {
    async fn post(&self, conversations: Vec<NotificationConversation>) -> Result<()> {
        for conversation in &conversations {
            let rendered = self.renderer.render(conversation);
            info!(
                group = %rendered.group_key,
                when = rendered.when,
                "{}: {}",
                rendered.title,
                rendered.summary().unwrap_or_default()
            );
            for line in &rendered.lines {
                debug!(group = %rendered.group_key, "  {} ({}): {}", line.sender, line.time, line.text);
            }
        }
        Ok(())
    }
}
