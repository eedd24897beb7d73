//! Refresh batch assembly
//!
//! The core delivers changed conversations in batches. A batch may mention the
//! same conversation more than once (for example when new messages arrive
//! while an earlier change is still queued), so assembly:
//!
//! 1. transforms every conversation record,
//! 2. merges records sharing an id into one notification group,
//! 3. drops repeated messages,
//! 4. caps how many messages a group retains,
//! 5. orders groups by most recent activity.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::model::{LocalConversation, NotificationConversation, NotificationMessage};
use crate::transform::into_notification_conversation;

/// Default number of messages kept per notification group
pub const DEFAULT_MAX_MESSAGES_PER_CONVERSATION: usize = 25;

/// Limits applied while assembling a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyLimits {
    /// Keep only the newest N messages per group (0 = unlimited)
    #[serde(default = "default_max_messages")]
    pub max_messages_per_conversation: usize,

    /// Keep groups that end up with no messages
    #[serde(default)]
    pub keep_empty: bool,
}

fn default_max_messages() -> usize {
    DEFAULT_MAX_MESSAGES_PER_CONVERSATION
}

impl Default for AssemblyLimits {
    fn default() -> Self {
        Self {
            max_messages_per_conversation: DEFAULT_MAX_MESSAGES_PER_CONVERSATION,
            keep_empty: false,
        }
    }
}

impl AssemblyLimits {
    /// No cap, empty groups kept
    pub fn unlimited() -> Self {
        Self {
            max_messages_per_conversation: 0,
            keep_empty: true,
        }
    }
}

/// Assemble a refresh batch into notification groups, most recent first
pub fn assemble(
    batch: &[LocalConversation],
    limits: &AssemblyLimits,
) -> Vec<NotificationConversation> {
    let mut groups: Vec<NotificationConversation> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in batch {
        let conversation = into_notification_conversation(record);
        match index.get(&conversation.id) {
            Some(&position) => {
                trace!("Merging repeated conversation {}", conversation.id);
                merge_into(&mut groups[position], conversation);
            }
            None => {
                index.insert(conversation.id.clone(), groups.len());
                groups.push(conversation);
            }
        }
    }

    let before = groups.len();
    let mut assembled: Vec<NotificationConversation> = groups
        .into_iter()
        .map(|group| finish_group(group, limits))
        .filter(|group| limits.keep_empty || !group.messages.is_empty())
        .collect();

    // Stable: ties keep first-appearance order
    assembled.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));

    debug!(
        "Assembled {} records into {} notification groups ({} dropped as empty)",
        batch.len(),
        assembled.len(),
        before - assembled.len()
    );

    assembled
}

/// Fold a later record for the same conversation into an existing group
fn merge_into(group: &mut NotificationConversation, later: NotificationConversation) {
    group.name = later.name;
    group.is_one_to_one_conversation = later.is_one_to_one_conversation;
    if later.image.is_some() {
        group.image = later.image;
    }
    group.last_message_time = group.last_message_time.max(later.last_message_time);
    group.messages.extend(later.messages);
}

fn finish_group(
    mut group: NotificationConversation,
    limits: &AssemblyLimits,
) -> NotificationConversation {
    group.messages = dedup_messages(group.messages);
    group.messages.sort_by_key(NotificationMessage::time);

    let cap = limits.max_messages_per_conversation;
    if cap > 0 && group.messages.len() > cap {
        let excess = group.messages.len() - cap;
        group.messages.drain(..excess);
    }

    group
}

/// Drop exact repeats, keeping the first occurrence
fn dedup_messages(messages: Vec<NotificationMessage>) -> Vec<NotificationMessage> {
    let mut seen: HashSet<NotificationMessage> = HashSet::with_capacity(messages.len());
    messages
        .into_iter()
        .filter(|message| seen.insert(message.clone()))
        .collect()
}
