//! Notification Content Assembler
//!
//! Turns the conversation and message records a messaging core produces on
//! every notification refresh into presentation-ready notification groups:
//! one group per conversation, messages oldest first, groups ordered by most
//! recent activity.
//!
//! The crate is layered leaf first:
//!
//! - [`comment`]: classifies non-text messages into string templates
//! - [`transform`]: pure record-to-notification mappings
//! - [`batch`]: merges, deduplicates, caps and orders a refresh batch
//! - [`render`]: produces notification text lines
//! - [`pipeline`]: drives a change stream into a [`NotificationSink`]

pub mod batch;
pub mod comment;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod transform;

mod error;

pub use batch::{assemble, AssemblyLimits, DEFAULT_MAX_MESSAGES_PER_CONVERSATION};
pub use comment::{CommentTemplate, LocalCommentKind};
pub use error::{NotifyError, Result};
pub use model::{
    LocalAuthor, LocalConversation, LocalMessage, NotificationAuthor, NotificationConversation,
    NotificationMessage, QualifiedId,
};
pub use pipeline::{BatchSender, NotificationPipeline, NotificationSink, PipelineStats};
pub use render::{
    NotificationRenderer, RenderConfig, RenderedLine, RenderedNotification, Templates,
    DEFAULT_MAX_BODY_LENGTH,
};
pub use transform::{into_notification_conversation, into_notification_message};
