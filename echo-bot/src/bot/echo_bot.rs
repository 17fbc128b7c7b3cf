use async_trait::async_trait;
use shared::{ChannelAccount, ConversationData, Result, UserProfile};
use tracing::info;

use super::flow;
use super::handler::ActivityHandler;
use super::messages::WELCOME_TEXT;
use super::turn::TurnContext;
use crate::state::{BotState, StatePropertyAccessor};

pub const CONVERSATION_DATA_PROPERTY: &str = "conversationData";
pub const USER_PROFILE_PROPERTY: &str = "USER_PROFILE_PROPERTY";

pub struct EchoBot {
    conversation_data: StatePropertyAccessor<ConversationData>,
    user_profile: StatePropertyAccessor<UserProfile>,
}

impl EchoBot {
    pub fn new(conversation_state: &BotState, user_state: &BotState) -> Self {
        Self {
            conversation_data: conversation_state.create_property(CONVERSATION_DATA_PROPERTY),
            user_profile: user_state.create_property(USER_PROFILE_PROPERTY),
        }
    }
}

#[async_trait]
impl ActivityHandler for EchoBot {
    async fn on_message(&self, turn: &mut TurnContext<'_>) -> Result<()> {
        let profile = self
            .user_profile
            .get(&turn.state.user, UserProfile::default())?;
        let conversation = self
            .conversation_data
            .get(&turn.state.conversation, ConversationData::default())?;

        let outcome = flow::advance(profile, conversation, turn.activity());

        self.user_profile.set(&mut turn.state.user, &outcome.profile)?;
        self.conversation_data
            .set(&mut turn.state.conversation, &outcome.conversation)?;

        turn.send_text(outcome.reply).await?;

        for line in &outcome.log_lines {
            info!(phase = ?outcome.phase, "{}", line);
        }

        Ok(())
    }

    async fn on_members_added(
        &self,
        members: &[ChannelAccount],
        turn: &mut TurnContext<'_>,
    ) -> Result<()> {
        let recipient_id = turn.activity().recipient.id.clone();

        for member in members.iter().filter(|m| m.id != recipient_id) {
            let mut welcome = turn.activity().create_reply(WELCOME_TEXT);
            welcome.speak = Some(WELCOME_TEXT.to_string());
            turn.send_activity(welcome).await?;
            info!(member_id = %member.id, "{}", WELCOME_TEXT);
        }

        Ok(())
    }
}
