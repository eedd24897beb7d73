//! Batch Input
//!
//! Reads conversation batches as JSON Lines: each non-empty line is a JSON
//! array of conversation records. Lines that fail to decode are logged and
//! skipped.

use anyhow::{Context, Result};
use async_stream::stream;
use futures::Stream;
use notification_assembler::LocalConversation;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

/// Open the input source, `-` meaning stdin
pub async fn open(path: &str) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open input {}", path))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Decode batches line by line until end of input
pub fn batches<R>(reader: R) -> impl Stream<Item = Vec<LocalConversation>> + Send
where
    R: AsyncBufRead + Unpin + Send,
{
    stream! {
        let mut lines = reader.lines();
        let mut line_number = 0usize;

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("Stopped reading input at line {}: {}", line_number + 1, e);
                    break;
                }
            };
            line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<Vec<LocalConversation>>(trimmed) {
                Ok(batch) => yield batch,
                Err(e) => warn!("Skipping malformed batch on line {}: {}", line_number, e),
            }
        }
    }
}
