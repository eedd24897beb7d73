//! Notification text rendering
//!
//! Turns a [`NotificationConversation`] into the strings a platform
//! notification shows: a title, one line per message with its sender, and a
//! timestamp for ordering groups.
//!
//! Non-text lines come from a [`Templates`] table keyed by string resource
//! key, so a localized table can replace the English defaults.
//!
//! ## Example
//!
//! ```rust
//! use notification_assembler::{NotificationConversation, NotificationRenderer, RenderConfig};
//!
//! let renderer = NotificationRenderer::new(RenderConfig::default());
//! let conversation = NotificationConversation {
//!     id: "c1".to_string(),
//!     name: "Team".to_string(),
//!     image: None,
//!     messages: Vec::new(),
//!     is_one_to_one_conversation: false,
//!     last_message_time: 0,
//! };
//!
//! let rendered = renderer.render(&conversation);
//! assert_eq!(rendered.title, "Team");
//! assert!(rendered.lines.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::comment::CommentTemplate;
use crate::error::{NotifyError, Result};
use crate::model::{NotificationConversation, NotificationMessage};

pub const KNOCK_KEY: &str = "notification_knock";
pub const CONNECTION_REQUEST_KEY: &str = "notification_connection_request";
pub const CONVERSATION_DELETED_KEY: &str = "notification_conversation_deleted";
/// `{text}` is replaced by the message text; without it the template is a prefix
pub const QUOTING_SELF_KEY: &str = "notification_quoting_self";

/// Default maximum line length in characters
pub const DEFAULT_MAX_BODY_LENGTH: usize = 200;

/// String templates keyed by resource key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    strings: HashMap<String, String>,
}

impl Default for Templates {
    fn default() -> Self {
        let strings = [
            (CommentTemplate::Picture.resource_key(), "Shared a picture"),
            (CommentTemplate::File.resource_key(), "Shared a file"),
            (CommentTemplate::Reaction.resource_key(), "Reacted to your message"),
            (CommentTemplate::MissedCall.resource_key(), "Missed call"),
            (
                CommentTemplate::NotSupported.resource_key(),
                "Sent a message that can't be displayed",
            ),
            (KNOCK_KEY, "Pinged"),
            (CONNECTION_REQUEST_KEY, "Wants to connect"),
            (CONVERSATION_DELETED_KEY, "Deleted the conversation"),
            (QUOTING_SELF_KEY, "Replied to you: {text}"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        Self { strings }
    }
}

impl Templates {
    /// Defaults with the given entries replaced
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut templates = Self::default();
        for (key, value) in overrides {
            templates.strings.insert(key.clone(), value.clone());
        }
        templates
    }

    /// Look up a template; unknown keys render as the key itself
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }
}

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Longest line in characters before truncation (0 = never truncate)
    #[serde(default = "default_max_body_length")]
    pub max_body_length: usize,

    /// Template replacements by resource key
    #[serde(default)]
    pub templates: HashMap<String, String>,
}

fn default_max_body_length() -> usize {
    DEFAULT_MAX_BODY_LENGTH
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_body_length: DEFAULT_MAX_BODY_LENGTH,
            templates: HashMap::new(),
        }
    }
}

impl RenderConfig {
    /// Reject overrides for keys no message ever renders with
    pub fn validate(&self) -> Result<()> {
        let known = Templates::default();
        let mut unknown: Vec<&str> = self
            .templates
            .keys()
            .map(String::as_str)
            .filter(|key| !known.contains_key(key))
            .collect();

        if unknown.is_empty() {
            return Ok(());
        }

        unknown.sort_unstable();
        Err(NotifyError::Configuration(format!(
            "unknown template keys: {}",
            unknown.join(", ")
        )))
    }
}

/// One rendered message line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLine {
    pub sender: String,
    pub text: String,
    pub time: i64,
}

/// A notification group ready for the platform notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNotification {
    /// Conversation id, used to group and replace notifications
    pub group_key: String,
    pub title: String,
    /// Milliseconds since the Unix epoch
    pub when: i64,
    pub is_group: bool,
    /// Oldest first
    pub lines: Vec<RenderedLine>,
}

impl RenderedNotification {
    /// Collapsed one-line form, built from the newest line
    pub fn summary(&self) -> Option<String> {
        self.lines.last().map(|line| {
            if self.is_group {
                format!("{}: {}", line.sender, line.text)
            } else {
                line.text.clone()
            }
        })
    }
}

/// Renders notification groups to text
#[derive(Debug, Clone)]
pub struct NotificationRenderer {
    templates: Templates,
    max_body_length: usize,
}

impl NotificationRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            templates: Templates::with_overrides(&config.templates),
            max_body_length: config.max_body_length,
        }
    }

    pub fn render(&self, conversation: &NotificationConversation) -> RenderedNotification {
        RenderedNotification {
            group_key: conversation.id.clone(),
            title: conversation.name.clone(),
            when: conversation.last_message_time,
            is_group: !conversation.is_one_to_one_conversation,
            lines: conversation
                .messages
                .iter()
                .map(|message| self.render_line(message))
                .collect(),
        }
    }

    pub fn render_line(&self, message: &NotificationMessage) -> RenderedLine {
        let text = match message {
            NotificationMessage::Text {
                text,
                is_quoting_self_user,
                ..
            } => {
                if *is_quoting_self_user {
                    quote(self.templates.get(QUOTING_SELF_KEY), text)
                } else {
                    text.clone()
                }
            }
            NotificationMessage::Comment { template, .. } => {
                self.templates.get(template.resource_key()).to_string()
            }
            NotificationMessage::Knock { .. } => self.templates.get(KNOCK_KEY).to_string(),
            NotificationMessage::ConnectionRequest { .. } => {
                self.templates.get(CONNECTION_REQUEST_KEY).to_string()
            }
            NotificationMessage::ConversationDeleted { .. } => {
                self.templates.get(CONVERSATION_DELETED_KEY).to_string()
            }
        };

        RenderedLine {
            sender: message.author().name.clone(),
            text: truncate(&text, self.max_body_length),
            time: message.time(),
        }
    }
}

fn quote(template: &str, text: &str) -> String {
    if template.contains("{text}") {
        template.replace("{text}", text)
    } else {
        format!("{} {}", template, text)
    }
}

/// Cut to `max` characters plus an ellipsis, on a character boundary
fn truncate(text: &str, max: usize) -> String {
    if max == 0 || text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}
