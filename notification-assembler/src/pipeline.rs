//! Notification Refresh Pipeline
//!
//! Consumes the messaging core's change stream, one batch of changed
//! conversations per item, and posts assembled notification groups to a
//! [`NotificationSink`].
//!
//! ## Flow
//!
//! ```text
//! core change stream ──► assemble(batch) ──► NotificationSink::post
//!        (batches)        group/sort/dedup      (platform notifier)
//! ```
//!
//! The pipeline awaits each post before pulling the next batch, so
//! backpressure is whatever the stream provides. Recoverable sink errors are
//! logged and counted; anything else stops the pipeline.
//!
//! ## Example
//!
//! ```rust,ignore
//! use notification_assembler::{AssemblyLimits, NotificationPipeline};
//! use std::sync::Arc;
//!
//! let pipeline = Arc::new(NotificationPipeline::new(AssemblyLimits::default(), sink));
//! let (sender, task) = pipeline.clone().spawn(16);
//!
//! sender.submit(batch).await?;
//! drop(sender);
//! task.await??;
//!
//! println!("{:?}", pipeline.stats());
//! ```

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::batch::{assemble, AssemblyLimits};
use crate::model::{LocalConversation, NotificationConversation};
use crate::{NotifyError, Result};

/// Destination for assembled notification groups
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Post the current notification groups, most recent first
    async fn post(&self, conversations: Vec<NotificationConversation>) -> Result<()>;
}

/// Counters for a running pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub batches_received: u64,
    pub batches_posted: u64,
    pub conversations_posted: u64,
    pub messages_posted: u64,
    pub sink_errors: u64,
}

/// Assembles refresh batches and hands them to a sink
pub struct NotificationPipeline {
    limits: AssemblyLimits,
    sink: Arc<dyn NotificationSink>,
    stats: Mutex<PipelineStats>,
}

impl NotificationPipeline {
    pub fn new(limits: AssemblyLimits, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            limits,
            sink,
            stats: Mutex::new(PipelineStats::default()),
        }
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> PipelineStats {
        self.lock_stats().clone()
    }

    fn lock_stats(&self) -> std::sync::MutexGuard<'_, PipelineStats> {
        // Counters stay meaningful even if a holder panicked
        self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Assemble and post a single batch
    ///
    /// Returns the number of notification groups posted. Batches that
    /// assemble to nothing are not posted.
    pub async fn process_batch(&self, batch: &[LocalConversation]) -> Result<usize> {
        self.lock_stats().batches_received += 1;

        let conversations = assemble(batch, &self.limits);
        if conversations.is_empty() {
            debug!("Batch of {} records produced no notifications", batch.len());
            return Ok(0);
        }

        let count = conversations.len();
        let messages: usize = conversations.iter().map(|c| c.messages.len()).sum();

        match self.sink.post(conversations).await {
            Ok(()) => {
                let mut stats = self.lock_stats();
                stats.batches_posted += 1;
                stats.conversations_posted += count as u64;
                stats.messages_posted += messages as u64;
                debug!("Posted {} notification groups ({} messages)", count, messages);
                Ok(count)
            }
            Err(e) => {
                self.lock_stats().sink_errors += 1;
                Err(e)
            }
        }
    }

    /// Drive the pipeline until the stream ends
    ///
    /// Stops early, returning the error, when the sink fails in a way that is
    /// not recoverable.
    pub async fn run<S>(&self, stream: S) -> Result<()>
    where
        S: Stream<Item = Vec<LocalConversation>> + Send,
    {
        info!("Notification pipeline started");
        let mut stream = std::pin::pin!(stream);

        while let Some(batch) = stream.next().await {
            if let Err(e) = self.process_batch(&batch).await {
                if e.is_recoverable() {
                    warn!("Failed to post notifications: {}", e);
                    continue;
                }
                error!("Notification pipeline stopping: {}", e);
                return Err(e);
            }
        }

        info!("Notification pipeline finished: {:?}", self.stats());
        Ok(())
    }

    /// Run the pipeline on a background task fed through a channel
    ///
    /// The task ends once every [`BatchSender`] is dropped.
    pub fn spawn(self: Arc<Self>, buffer: usize) -> (BatchSender, JoinHandle<Result<()>>) {
        let (tx, mut rx) = mpsc::channel::<Vec<LocalConversation>>(buffer.max(1));

        let handle = tokio::spawn(async move {
            let stream = futures::stream::poll_fn(move |cx| rx.poll_recv(cx));
            self.run(stream).await
        });

        (BatchSender { tx }, handle)
    }
}

/// Feeds batches into a spawned pipeline
#[derive(Debug, Clone)]
pub struct BatchSender {
    tx: mpsc::Sender<Vec<LocalConversation>>,
}

impl BatchSender {
    /// Queue a batch, waiting for room in the channel
    ///
    /// Fails with [`NotifyError::Closed`] once the pipeline has stopped.
    pub async fn submit(&self, batch: Vec<LocalConversation>) -> Result<()> {
        self.tx.send(batch).await.map_err(|_| NotifyError::Closed)
    }
}
