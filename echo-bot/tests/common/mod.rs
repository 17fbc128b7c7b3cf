#![allow(dead_code)]

use echo_bot::bot::{build_dispatcher, TurnDispatcher, CONVERSATION_DATA_PROPERTY, USER_PROFILE_PROPERTY};
use echo_bot::state::MemoryStorage;
use shared::{Activity, ChannelAccount, ConversationData, UserProfile};
use std::sync::Arc;

pub const BOT_ID: &str = "bot";
pub const CHANNEL_ID: &str = "test";

pub struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub dispatcher: TurnDispatcher,
}

impl Harness {
    pub fn new() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let dispatcher = build_dispatcher(storage.clone());
        Self {
            storage,
            dispatcher,
        }
    }

    pub async fn conversation_data(&self, activity: &Activity) -> anyhow::Result<ConversationData> {
        let state = self.dispatcher.conversation_state();
        let snapshot = state.load(activity).await?;
        let accessor = state.create_property::<ConversationData>(CONVERSATION_DATA_PROPERTY);
        Ok(accessor.get(&snapshot, ConversationData::default())?)
    }

    pub async fn user_profile(&self, activity: &Activity) -> anyhow::Result<UserProfile> {
        let state = self.dispatcher.user_state();
        let snapshot = state.load(activity).await?;
        let accessor = state.create_property::<UserProfile>(USER_PROFILE_PROPERTY);
        Ok(accessor.get(&snapshot, UserProfile::default())?)
    }

    pub async fn seed_conversation_data(
        &self,
        activity: &Activity,
        data: &ConversationData,
    ) -> anyhow::Result<()> {
        let state = self.dispatcher.conversation_state();
        let mut snapshot = state.load(activity).await?;
        state
            .create_property::<ConversationData>(CONVERSATION_DATA_PROPERTY)
            .set(&mut snapshot, data)?;
        state.save_changes(&mut snapshot, true).await?;
        Ok(())
    }

    pub async fn seed_user_profile(
        &self,
        activity: &Activity,
        profile: &UserProfile,
    ) -> anyhow::Result<()> {
        let state = self.dispatcher.user_state();
        let mut snapshot = state.load(activity).await?;
        state
            .create_property::<UserProfile>(USER_PROFILE_PROPERTY)
            .set(&mut snapshot, profile)?;
        state.save_changes(&mut snapshot, true).await?;
        Ok(())
    }
}

pub fn user_message(user_id: &str, text: &str) -> Activity {
    Activity::message(
        CHANNEL_ID,
        "conv1",
        ChannelAccount::new(user_id),
        ChannelAccount::new(BOT_ID),
        text,
    )
}

pub fn members_added(member_ids: &[&str]) -> Activity {
    Activity::members_added(
        CHANNEL_ID,
        "conv1",
        ChannelAccount::new("user1"),
        ChannelAccount::new(BOT_ID),
        member_ids.iter().map(|id| ChannelAccount::new(*id)).collect(),
    )
}

pub fn texts(activities: &[Activity]) -> Vec<String> {
    activities
        .iter()
        .map(|a| a.text.clone().unwrap_or_default())
        .collect()
}
