//! Comment classification
//!
//! Non-text messages (shared pictures and files, reactions, missed calls, and
//! content this client cannot show) are notified as a short comment. The core
//! tags them with a [`LocalCommentKind`]; the notification layer picks a string
//! template by [`CommentTemplate`].

use serde::{Deserialize, Serialize};

/// Comment kind as tagged by the messaging core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalCommentKind {
    Picture,
    File,
    Reaction,
    MissedCall,
    NotSupportedYet,
}

/// String template used to render a comment line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentTemplate {
    Picture,
    File,
    Reaction,
    MissedCall,
    NotSupported,
}

impl CommentTemplate {
    /// Every template, in declaration order
    pub const ALL: [CommentTemplate; 5] = [
        CommentTemplate::Picture,
        CommentTemplate::File,
        CommentTemplate::Reaction,
        CommentTemplate::MissedCall,
        CommentTemplate::NotSupported,
    ];

    /// String resource key of the template
    pub fn resource_key(&self) -> &'static str {
        match self {
            CommentTemplate::Picture => "notification_shared_picture",
            CommentTemplate::File => "notification_shared_file",
            CommentTemplate::Reaction => "notification_reacted",
            CommentTemplate::MissedCall => "notification_missed_call",
            CommentTemplate::NotSupported => "notification_not_supported_issue",
        }
    }
}

// No wildcard arm: a new core comment kind must be mapped here before it builds.
impl From<LocalCommentKind> for CommentTemplate {
    fn from(kind: LocalCommentKind) -> Self {
        match kind {
            LocalCommentKind::Picture => CommentTemplate::Picture,
            LocalCommentKind::File => CommentTemplate::File,
            LocalCommentKind::Reaction => CommentTemplate::Reaction,
            LocalCommentKind::MissedCall => CommentTemplate::MissedCall,
            LocalCommentKind::NotSupportedYet => CommentTemplate::NotSupported,
        }
    }
}
