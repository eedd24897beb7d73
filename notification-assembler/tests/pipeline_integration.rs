//! Pipeline Integration Tests
//!
//! Runs the refresh pipeline end to end: records decoded from JSON, batches
//! submitted through a spawned pipeline, groups posted to a recording sink and
//! rendered to text.

use async_trait::async_trait;
use notification_assembler::{
    AssemblyLimits, LocalConversation, NotificationConversation, NotificationPipeline,
    NotificationRenderer, NotificationSink, NotifyError, RenderConfig, Result,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingSink {
    posts: Mutex<Vec<Vec<NotificationConversation>>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn post(&self, conversations: Vec<NotificationConversation>) -> Result<()> {
        self.posts.lock().unwrap().push(conversations);
        Ok(())
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

const BATCH: &str = r#"[
    {
        "id": { "value": "team", "domain": "example.com" },
        "conversation_name": "Team",
        "is_one_to_one_conversation": false,
        "messages": [
            { "kind": "text", "author": { "name": "Alice" }, "time": 2000, "text": "lunch?" },
            { "kind": "knock", "author": { "name": "Bob" }, "time": 1000 }
        ]
    },
    {
        "id": { "value": "bob", "domain": "example.com" },
        "conversation_name": "Bob",
        "is_one_to_one_conversation": true,
        "messages": [
            { "kind": "comment", "author": { "name": "Bob" }, "time": 3000, "comment_kind": "picture" }
        ]
    },
    {
        "id": { "value": "team", "domain": "example.com" },
        "conversation_name": "Team",
        "is_one_to_one_conversation": false,
        "messages": [
            { "kind": "knock", "author": { "name": "Bob" }, "time": 1000 },
            { "kind": "text", "author": { "name": "Carol" }, "time": 1500, "text": "sure", "is_quoting_self_user": true }
        ]
    }
]"#;

#[tokio::test]
async fn test_spawned_pipeline_posts_assembled_batches() {
    init_logging();

    let sink = Arc::new(RecordingSink::default());
    let pipeline = Arc::new(NotificationPipeline::new(
        AssemblyLimits::default(),
        sink.clone(),
    ));
    let (sender, task) = pipeline.clone().spawn(4);

    let batch: Vec<LocalConversation> = serde_json::from_str(BATCH).unwrap();
    sender.submit(batch).await.unwrap();
    sender.submit(Vec::new()).await.unwrap();
    drop(sender);

    task.await.unwrap().unwrap();

    let posts = sink.posts.lock().unwrap();
    assert_eq!(posts.len(), 1);

    let groups = &posts[0];
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].id, "bob@example.com");
    assert_eq!(groups[1].id, "team@example.com");

    let team_times: Vec<i64> = groups[1].messages.iter().map(|m| m.time()).collect();
    assert_eq!(team_times, vec![1000, 1500, 2000]);
    assert_eq!(groups[1].last_message_time, 2000);

    let stats = pipeline.stats();
    assert_eq!(stats.batches_received, 2);
    assert_eq!(stats.batches_posted, 1);
    assert_eq!(stats.conversations_posted, 2);
    assert_eq!(stats.messages_posted, 4);
    assert_eq!(stats.sink_errors, 0);
}

#[tokio::test]
async fn test_submit_after_pipeline_stopped() {
    struct ClosedSink;

    #[async_trait]
    impl NotificationSink for ClosedSink {
        async fn post(&self, _conversations: Vec<NotificationConversation>) -> Result<()> {
            Err(NotifyError::SinkUnavailable("notifier exited".to_string()))
        }
    }

    let pipeline = Arc::new(NotificationPipeline::new(
        AssemblyLimits::default(),
        Arc::new(ClosedSink),
    ));
    let (sender, task) = pipeline.spawn(1);

    let batch: Vec<LocalConversation> = serde_json::from_str(BATCH).unwrap();
    sender.submit(batch.clone()).await.unwrap();

    let result = task.await.unwrap();
    assert!(matches!(result, Err(NotifyError::SinkUnavailable(_))));

    let err = sender.submit(batch).await.unwrap_err();
    assert!(matches!(err, NotifyError::Closed));
}

#[test]
fn test_rendered_batch() {
    let batch: Vec<LocalConversation> = serde_json::from_str(BATCH).unwrap();
    let groups = notification_assembler::assemble(&batch, &AssemblyLimits::default());
    let renderer = NotificationRenderer::new(RenderConfig::default());

    let direct = renderer.render(&groups[0]);
    assert!(!direct.is_group);
    assert_eq!(direct.summary().as_deref(), Some("Shared a picture"));

    let team = renderer.render(&groups[1]);
    let texts: Vec<&str> = team.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["Pinged", "Replied to you: sure", "lunch?"]);
    assert_eq!(team.summary().as_deref(), Some("Alice: lunch?"));
}
