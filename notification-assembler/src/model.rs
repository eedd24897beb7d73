//! Notification Data Model
//!
//! Two families of types live here:
//!
//! - **Local records** (`Local*`): what the messaging core hands over on every
//!   notification refresh. They are decoded from the core's JSON records.
//! - **Notification values** (`Notification*`): presentation-ready objects for
//!   the platform notification layer, one [`NotificationConversation`] per
//!   conversation group.
//!
//! ## Record Format
//!
//! ```json
//! {
//!     "id": { "value": "9a1c", "domain": "example.com" },
//!     "conversation_name": "Team",
//!     "is_one_to_one_conversation": false,
//!     "messages": [
//!         {
//!             "kind": "text",
//!             "author": { "name": "Alice" },
//!             "time": 1704067200000,
//!             "text": "Hello!",
//!             "is_quoting_self_user": false
//!         },
//!         {
//!             "kind": "comment",
//!             "author": { "name": "Bob" },
//!             "time": 1704067260000,
//!             "comment_kind": "picture"
//!         }
//!     ]
//! }
//! ```
//!
//! Message times are milliseconds since the Unix epoch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::comment::{CommentTemplate, LocalCommentKind};

/// Federated identifier: a value scoped to a backend domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedId {
    pub value: String,
    #[serde(default)]
    pub domain: String,
}

impl QualifiedId {
    pub fn new(value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            domain: domain.into(),
        }
    }
}

impl fmt::Display for QualifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.domain.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{}@{}", self.value, self.domain)
        }
    }
}

/// Message author as known to the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAuthor {
    pub name: String,

    /// Asset handle of the author's avatar, if the core knows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_asset: Option<String>,
}

impl LocalAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_asset: None,
        }
    }
}

/// A single message record inside a notification refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocalMessage {
    Text {
        author: LocalAuthor,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        time: DateTime<Utc>,
        text: String,
        #[serde(default)]
        is_quoting_self_user: bool,
    },
    /// Shared picture or file, reaction, missed call, unsupported content
    Comment {
        author: LocalAuthor,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        time: DateTime<Utc>,
        comment_kind: LocalCommentKind,
    },
    Knock {
        author: LocalAuthor,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        time: DateTime<Utc>,
    },
    ConnectionRequest {
        author: LocalAuthor,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        time: DateTime<Utc>,
        author_id: QualifiedId,
    },
    ConversationDeleted {
        author: LocalAuthor,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        time: DateTime<Utc>,
    },
}

impl LocalMessage {
    pub fn author(&self) -> &LocalAuthor {
        match self {
            LocalMessage::Text { author, .. }
            | LocalMessage::Comment { author, .. }
            | LocalMessage::Knock { author, .. }
            | LocalMessage::ConnectionRequest { author, .. }
            | LocalMessage::ConversationDeleted { author, .. } => author,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        match self {
            LocalMessage::Text { time, .. }
            | LocalMessage::Comment { time, .. }
            | LocalMessage::Knock { time, .. }
            | LocalMessage::ConnectionRequest { time, .. }
            | LocalMessage::ConversationDeleted { time, .. } => *time,
        }
    }
}

/// A conversation with the messages that need notifying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConversation {
    pub id: QualifiedId,
    pub conversation_name: String,
    #[serde(default)]
    pub is_one_to_one_conversation: bool,
    /// In no particular order
    #[serde(default)]
    pub messages: Vec<LocalMessage>,
}

/// Author line of a notification
///
/// Equality and hashing compare the avatar by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationAuthor {
    pub name: String,
    #[serde(
        default,
        with = "serde_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Vec<u8>>,
}

/// One line of a conversation notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationMessage {
    Text {
        author: NotificationAuthor,
        /// Milliseconds since the Unix epoch
        time: i64,
        text: String,
        is_quoting_self_user: bool,
    },
    Comment {
        author: NotificationAuthor,
        time: i64,
        template: CommentTemplate,
    },
    Knock {
        author: NotificationAuthor,
        time: i64,
    },
    ConnectionRequest {
        author: NotificationAuthor,
        time: i64,
        author_id: String,
    },
    ConversationDeleted {
        author: NotificationAuthor,
        time: i64,
    },
}

impl NotificationMessage {
    pub fn author(&self) -> &NotificationAuthor {
        match self {
            NotificationMessage::Text { author, .. }
            | NotificationMessage::Comment { author, .. }
            | NotificationMessage::Knock { author, .. }
            | NotificationMessage::ConnectionRequest { author, .. }
            | NotificationMessage::ConversationDeleted { author, .. } => author,
        }
    }

    /// Milliseconds since the Unix epoch
    pub fn time(&self) -> i64 {
        match self {
            NotificationMessage::Text { time, .. }
            | NotificationMessage::Comment { time, .. }
            | NotificationMessage::Knock { time, .. }
            | NotificationMessage::ConnectionRequest { time, .. }
            | NotificationMessage::ConversationDeleted { time, .. } => *time,
        }
    }
}

/// A notification group: one conversation and its pending messages
///
/// Equality and hashing compare the conversation image by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationConversation {
    pub id: String,
    pub name: String,
    #[serde(
        default,
        with = "serde_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Vec<u8>>,
    /// Oldest first
    pub messages: Vec<NotificationMessage>,
    pub is_one_to_one_conversation: bool,
    /// Milliseconds since the Unix epoch, 0 when there are no messages
    pub last_message_time: i64,
}
