//! Record to notification transforms
//!
//! Pure mappings from the core's local records to notification values. Both
//! functions are total: every input shape has an output and nothing here can
//! fail.

use crate::comment::CommentTemplate;
use crate::model::{
    LocalConversation, LocalMessage, NotificationAuthor, NotificationConversation,
    NotificationMessage,
};

/// Convert one local message into its notification line
///
/// The author's avatar is not resolved; `image` is always `None`.
pub fn into_notification_message(message: &LocalMessage) -> NotificationMessage {
    let author = NotificationAuthor {
        name: message.author().name.clone(),
        image: None,
    };
    let time = message.time().timestamp_millis();

    match message {
        LocalMessage::Text {
            text,
            is_quoting_self_user,
            ..
        } => NotificationMessage::Text {
            author,
            time,
            text: text.clone(),
            is_quoting_self_user: *is_quoting_self_user,
        },
        LocalMessage::Comment { comment_kind, .. } => NotificationMessage::Comment {
            author,
            time,
            template: CommentTemplate::from(*comment_kind),
        },
        LocalMessage::Knock { .. } => NotificationMessage::Knock { author, time },
        LocalMessage::ConnectionRequest { author_id, .. } => {
            NotificationMessage::ConnectionRequest {
                author,
                time,
                author_id: author_id.to_string(),
            }
        }
        LocalMessage::ConversationDeleted { .. } => {
            NotificationMessage::ConversationDeleted { author, time }
        }
    }
}

/// Convert one local conversation into a notification group
///
/// Messages come out oldest first; equal timestamps keep their input order.
pub fn into_notification_conversation(conversation: &LocalConversation) -> NotificationConversation {
    let mut messages: Vec<NotificationMessage> = conversation
        .messages
        .iter()
        .map(into_notification_message)
        .collect();
    messages.sort_by_key(NotificationMessage::time);

    let last_message_time = conversation
        .messages
        .iter()
        .map(|m| m.time().timestamp_millis())
        .max()
        .unwrap_or(0);

    NotificationConversation {
        id: conversation.id.to_string(),
        name: conversation.conversation_name.clone(),
        image: None,
        messages,
        is_one_to_one_conversation: conversation.is_one_to_one_conversation,
        last_message_time,
    }
}

impl From<&LocalMessage> for NotificationMessage {
    fn from(message: &LocalMessage) -> Self {
        into_notification_message(message)
    }
}

impl From<&LocalConversation> for NotificationConversation {
    fn from(conversation: &LocalConversation) -> Self {
        into_notification_conversation(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::LocalCommentKind;
    use crate::model::{LocalAuthor, QualifiedId};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn text(name: &str, ms: i64, body: &str) -> LocalMessage {
        LocalMessage::Text {
            author: LocalAuthor::new(name),
            time: at(ms),
            text: body.to_string(),
            is_quoting_self_user: false,
        }
    }

    fn conversation(messages: Vec<LocalMessage>) -> LocalConversation {
        LocalConversation {
            id: QualifiedId::new("c1", "example.com"),
            conversation_name: "Team".to_string(),
            is_one_to_one_conversation: false,
            messages,
        }
    }

    #[test]
    fn test_text_keeps_quote_flag() {
        let message = LocalMessage::Text {
            author: LocalAuthor::new("Alice"),
            time: at(1_000),
            text: "see above".to_string(),
            is_quoting_self_user: true,
        };

        match into_notification_message(&message) {
            NotificationMessage::Text {
                author,
                time,
                text,
                is_quoting_self_user,
            } => {
                assert_eq!(author.name, "Alice");
                assert_eq!(time, 1_000);
                assert_eq!(text, "see above");
                assert!(is_quoting_self_user);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_author_image_is_never_resolved() {
        let message = LocalMessage::Knock {
            author: LocalAuthor {
                name: "Bob".to_string(),
                image_asset: Some("asset-7".to_string()),
            },
            time: at(5),
        };

        let notification = into_notification_message(&message);
        assert_eq!(notification.author().image, None);
    }

    #[test]
    fn test_comment_is_classified() {
        let message = LocalMessage::Comment {
            author: LocalAuthor::new("Bob"),
            time: at(10),
            comment_kind: LocalCommentKind::NotSupportedYet,
        };

        assert_eq!(
            into_notification_message(&message),
            NotificationMessage::Comment {
                author: NotificationAuthor {
                    name: "Bob".to_string(),
                    image: None
                },
                time: 10,
                template: CommentTemplate::NotSupported,
            }
        );
    }

    #[test]
    fn test_connection_request_carries_author_id() {
        let message = LocalMessage::ConnectionRequest {
            author: LocalAuthor::new("Carol"),
            time: at(20),
            author_id: QualifiedId::new("u3", "example.com"),
        };

        match into_notification_message(&message) {
            NotificationMessage::ConnectionRequest { author_id, .. } => {
                assert_eq!(author_id, "u3@example.com");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_messages_sorted_and_last_time() {
        let input = conversation(vec![
            text("A", 200, "third"),
            text("B", 50, "first"),
            text("C", 100, "second"),
        ]);

        let output = into_notification_conversation(&input);
        let times: Vec<i64> = output.messages.iter().map(|m| m.time()).collect();

        assert_eq!(times, vec![50, 100, 200]);
        assert_eq!(output.last_message_time, 200);
        assert_eq!(output.id, "c1@example.com");
        assert_eq!(output.image, None);
    }

    #[test]
    fn test_equal_times_keep_input_order() {
        let input = conversation(vec![
            text("A", 100, "one"),
            text("B", 100, "two"),
            text("C", 50, "zero"),
        ]);

        let output = into_notification_conversation(&input);
        let names: Vec<&str> = output
            .messages
            .iter()
            .map(|m| m.author().name.as_str())
            .collect();

        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_empty_conversation() {
        let input = LocalConversation {
            id: QualifiedId::new("c1", ""),
            conversation_name: "Empty".to_string(),
            is_one_to_one_conversation: true,
            messages: Vec::new(),
        };

        let output = into_notification_conversation(&input);
        assert_eq!(
            output,
            NotificationConversation {
                id: "c1".to_string(),
                name: "Empty".to_string(),
                image: None,
                messages: Vec::new(),
                is_one_to_one_conversation: true,
                last_message_time: 0,
            }
        );
    }
}
