//! Error handling for notification assembly
//!
//! The transforms themselves are total and never fail. Errors only arise at
//! the edges: decoding raw records, talking to a notification sink, reading
//! configuration, or submitting to a pipeline that has stopped.
//!
//! ## Error Handling Patterns
//!
//! ```rust
//! use notification_assembler::{LocalConversation, Result};
//!
//! fn decode_batch(data: &[u8]) -> Result<Vec<LocalConversation>> {
//!     // serde_json errors convert automatically
//!     let batch = serde_json::from_slice(data)?;
//!     Ok(batch)
//! }
//! ```
//!
//! Sinks report failures with [`NotifyError::Sink`]; the refresh pipeline keeps
//! running for errors where [`NotifyError::is_recoverable`] is true and stops
//! otherwise.

use thiserror::Error;

/// Result type for notification assembly operations
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Errors that can occur around notification assembly
///
/// # Examples
///
/// ```rust
/// use notification_assembler::NotifyError;
///
/// let error = NotifyError::Sink("notification service unavailable".to_string());
/// assert_eq!(error.to_string(), "Sink error: notification service unavailable");
///
/// let error = NotifyError::Closed;
/// assert_eq!(error.to_string(), "Pipeline closed");
/// ```
#[derive(Error, Debug)]
pub enum NotifyError {
    /// I/O error while reading input or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw record could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The notification sink rejected a post, but may accept a retry
    #[error("Sink error: {0}")]
    Sink(String),

    /// The notification sink can no longer accept posts
    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The refresh pipeline has stopped and accepts no more batches
    #[error("Pipeline closed")]
    Closed,
}

impl NotifyError {
    /// Build a sink error from any displayable cause
    pub fn sink(msg: impl Into<String>) -> Self {
        NotifyError::Sink(msg.into())
    }

    /// Whether the pipeline should carry on after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            NotifyError::Sink(_) | NotifyError::Json(_) | NotifyError::Io(_)
        )
    }

    /// User-facing description of the error
    pub fn user_message(&self) -> String {
        match self {
            NotifyError::Io(e) => format!("I/O error: {}.", e),
            NotifyError::Json(e) => format!("Data format error: {}.", e),
            NotifyError::Sink(msg) => {
                format!("Could not post notifications: {}. Will retry on next update.", msg)
            }
            NotifyError::SinkUnavailable(msg) => {
                format!("Notification service unavailable: {}.", msg)
            }
            NotifyError::Configuration(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            NotifyError::Closed => {
                "Notification updates stopped. No further notifications will be shown.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = NotifyError::Sink("busy".to_string());
        assert_eq!(error.to_string(), "Sink error: busy");

        let error = NotifyError::Configuration("max_body_length must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: max_body_length must be positive"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json = r#"{"invalid json"#;
        let json_error = serde_json::from_str::<serde_json::Value>(json).unwrap_err();
        let error: NotifyError = json_error.into();

        assert!(matches!(error, NotifyError::Json(_)));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(NotifyError::sink("timeout").is_recoverable());
        assert!(!NotifyError::SinkUnavailable("gone".to_string()).is_recoverable());
        assert!(!NotifyError::Closed.is_recoverable());
        assert!(!NotifyError::Configuration("bad".to_string()).is_recoverable());
    }

    #[test]
    fn test_user_message() {
        let msg = NotifyError::Closed.user_message();
        assert!(msg.contains("stopped"));

        let msg = NotifyError::sink("busy").user_message();
        assert!(msg.contains("busy"));
    }
}
