mod common;

use anyhow::Result;
use async_trait::async_trait;
use common::{members_added, texts, user_message, Harness, BOT_ID};
use echo_bot::bot::{
    build_dispatcher, ActivityHandler, BufferedSender, ChannelSender, TurnContext,
    CONVERSATION_DATA_PROPERTY,
};
use echo_bot::state::{MemoryStorage, StatePropertyAccessor};
use shared::{Activity, ConversationData, ServiceError, UserProfile};
use std::sync::Arc;
use tokio::sync::Mutex;

const WELCOME: &str = "Welcome to ASSR G4 Bot. Type anything to get started.!";

#[tokio::test]
async fn test_new_user_is_prompted_for_name() -> Result<()> {
    let harness = Harness::new();
    let activity = user_message("user1", "hi");
    let sender = BufferedSender::new();

    let replies = harness.dispatcher.run(activity.clone(), &sender).await?;

    assert_eq!(texts(&replies), vec!["What is your name?"]);
    assert_eq!(sender.sent().await.len(), 1);

    let data = harness.conversation_data(&activity).await?;
    assert!(data.prompted_for_user_name);
    assert_eq!(harness.user_profile(&activity).await?.name, None);

    Ok(())
}

#[tokio::test]
async fn test_prompted_user_name_is_stored() -> Result<()> {
    let harness = Harness::new();
    let activity = user_message("user1", "Alice");
    harness
        .seed_conversation_data(
            &activity,
            &ConversationData {
                prompted_for_user_name: true,
                ..Default::default()
            },
        )
        .await?;

    let replies = harness
        .dispatcher
        .run(activity.clone(), &BufferedSender::new())
        .await?;

    assert_eq!(
        texts(&replies),
        vec!["Thanks Alice. To see conversation data, type anything."]
    );
    assert_eq!(
        harness.user_profile(&activity).await?.name.as_deref(),
        Some("Alice")
    );
    assert!(!harness.conversation_data(&activity).await?.prompted_for_user_name);

    Ok(())
}

#[tokio::test]
async fn test_known_user_message_is_echoed() -> Result<()> {
    let harness = Harness::new();
    let activity = user_message("user1", "hello");
    harness
        .seed_user_profile(
            &activity,
            &UserProfile {
                name: Some("Alice".to_string()),
            },
        )
        .await?;

    let replies = harness
        .dispatcher
        .run(activity.clone(), &BufferedSender::new())
        .await?;

    assert_eq!(texts(&replies), vec!["Alice sent: hello"]);

    let data = harness.conversation_data(&activity).await?;
    assert_eq!(data.channel_id.as_deref(), Some("test"));
    assert!(data.timestamp.is_some());
    assert!(!data.prompted_for_user_name);
    assert_eq!(
        harness.user_profile(&activity).await?.name.as_deref(),
        Some("Alice")
    );

    Ok(())
}

#[tokio::test]
async fn test_full_conversation() -> Result<()> {
    let harness = Harness::new();
    let sender = BufferedSender::new();

    harness.dispatcher.run(user_message("user1", "hi"), &sender).await?;
    harness.dispatcher.run(user_message("user1", "Bob"), &sender).await?;
    harness
        .dispatcher
        .run(user_message("user1", "how are you?"), &sender)
        .await?;
    harness.dispatcher.run(user_message("user1", "bye"), &sender).await?;

    assert_eq!(
        texts(&sender.sent().await),
        vec![
            "What is your name?",
            "Thanks Bob. To see conversation data, type anything.",
            "Bob sent: how are you?",
            "Bob sent: bye",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_replies_are_addressed_to_sender() -> Result<()> {
    let harness = Harness::new();
    let activity = user_message("user1", "hi");

    let replies = harness
        .dispatcher
        .run(activity.clone(), &BufferedSender::new())
        .await?;

    let reply = &replies[0];
    assert_eq!(reply.from.id, BOT_ID);
    assert_eq!(reply.recipient.id, "user1");
    assert_eq!(reply.conversation.id, activity.conversation.id);
    assert_eq!(reply.reply_to_id, activity.id);

    Ok(())
}

#[tokio::test]
async fn test_user_profile_is_scoped_per_user() -> Result<()> {
    let harness = Harness::new();
    let sender = BufferedSender::new();

    harness.dispatcher.run(user_message("user1", "hi"), &sender).await?;
    harness.dispatcher.run(user_message("user1", "Alice"), &sender).await?;

    let replies = harness
        .dispatcher
        .run(user_message("user2", "hello"), &sender)
        .await?;

    assert_eq!(texts(&replies), vec!["What is your name?"]);
    assert_eq!(
        harness.user_profile(&user_message("user1", "")).await?.name.as_deref(),
        Some("Alice")
    );
    assert_eq!(harness.user_profile(&user_message("user2", "")).await?.name, None);

    Ok(())
}

#[tokio::test]
async fn test_members_added_welcomes_everyone_but_the_bot() -> Result<()> {
    let harness = Harness::new();

    let replies = harness
        .dispatcher
        .run(members_added(&[BOT_ID, "user1"]), &BufferedSender::new())
        .await?;

    assert_eq!(texts(&replies), vec![WELCOME]);
    assert_eq!(replies[0].speak.as_deref(), Some(WELCOME));
    assert!(harness.storage.is_empty().await);

    Ok(())
}

#[tokio::test]
async fn test_members_added_replay_is_stable() -> Result<()> {
    let harness = Harness::new();
    let activity = members_added(&["user1", BOT_ID, "user2"]);

    for _ in 0..2 {
        let replies = harness
            .dispatcher
            .run(activity.clone(), &BufferedSender::new())
            .await?;
        assert_eq!(replies.len(), 2);
    }

    Ok(())
}

#[tokio::test]
async fn test_members_added_with_only_bot_sends_nothing() -> Result<()> {
    let harness = Harness::new();

    let replies = harness
        .dispatcher
        .run(members_added(&[BOT_ID]), &BufferedSender::new())
        .await?;

    assert!(replies.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unrecognized_activity_is_ignored() -> Result<()> {
    let harness = Harness::new();
    let activity = members_added(&[]);

    let replies = harness
        .dispatcher
        .run(activity, &BufferedSender::new())
        .await?;

    assert!(replies.is_empty());
    assert!(harness.storage.is_empty().await);

    Ok(())
}

#[tokio::test]
async fn test_invalid_activity_touches_no_state() -> Result<()> {
    let harness = Harness::new();
    let mut activity = user_message("user1", "hi");
    activity.conversation.id.clear();

    let result = harness
        .dispatcher
        .run(activity, &BufferedSender::new())
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidActivity(_))));
    assert!(harness.storage.is_empty().await);

    Ok(())
}

struct FailingSender;

#[async_trait]
impl ChannelSender for FailingSender {
    async fn send(&self, _activity: &Activity) -> shared::Result<()> {
        Err(ServiceError::Channel("channel unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_send_failure_skips_state_save() -> Result<()> {
    let harness = Harness::new();

    let result = harness
        .dispatcher
        .run(user_message("user1", "hi"), &FailingSender)
        .await;

    assert!(matches!(result, Err(ServiceError::Channel(_))));
    assert!(harness.storage.is_empty().await);

    Ok(())
}

/// Records the prompt flag as left by the handlers before it in the chain.
struct FlagObserver {
    conversation_data: StatePropertyAccessor<ConversationData>,
    seen: Mutex<Vec<bool>>,
}

#[async_trait]
impl ActivityHandler for FlagObserver {
    async fn on_message(&self, turn: &mut TurnContext<'_>) -> shared::Result<()> {
        let data = self
            .conversation_data
            .get(&turn.state.conversation, ConversationData::default())?;
        self.seen.lock().await.push(data.prompted_for_user_name);
        Ok(())
    }
}

struct FailingHandler;

#[async_trait]
impl ActivityHandler for FailingHandler {
    async fn on_message(&self, _turn: &mut TurnContext<'_>) -> shared::Result<()> {
        Err(ServiceError::Internal("downstream handler failed".to_string()))
    }
}

#[tokio::test]
async fn test_handlers_run_in_chain_order() -> Result<()> {
    let storage = Arc::new(MemoryStorage::new());
    let dispatcher = build_dispatcher(storage);
    let observer = Arc::new(FlagObserver {
        conversation_data: dispatcher
            .conversation_state()
            .create_property(CONVERSATION_DATA_PROPERTY),
        seen: Mutex::new(Vec::new()),
    });
    let dispatcher = dispatcher.with_handler(observer.clone());

    dispatcher
        .run(user_message("user1", "hi"), &BufferedSender::new())
        .await?;

    assert_eq!(*observer.seen.lock().await, vec![true]);

    Ok(())
}

#[tokio::test]
async fn test_downstream_error_skips_state_save() -> Result<()> {
    let storage = Arc::new(MemoryStorage::new());
    let dispatcher = build_dispatcher(storage.clone()).with_handler(Arc::new(FailingHandler));
    let sender = BufferedSender::new();

    let result = dispatcher.run(user_message("user1", "hi"), &sender).await;

    assert!(matches!(result, Err(ServiceError::Internal(_))));
    assert_eq!(texts(&sender.sent().await), vec!["What is your name?"]);
    assert!(storage.is_empty().await);

    Ok(())
}
