use chrono::Utc;
use shared::{record_counter, record_timing, Activity, ActivityType, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::handler::ActivityHandler;
use super::turn::{ChannelSender, TurnContext, TurnState};
use crate::state::BotState;

/// Runs one turn: load state, invoke the handler chain in order, save state.
#[derive(Clone)]
pub struct TurnDispatcher {
    conversation_state: BotState,
    user_state: BotState,
    handlers: Vec<Arc<dyn ActivityHandler>>,
}

impl TurnDispatcher {
    pub fn new(conversation_state: BotState, user_state: BotState) -> Self {
        Self {
            conversation_state,
            user_state,
            handlers: Vec::new(),
        }
    }

    pub fn with_handler(mut self, handler: Arc<dyn ActivityHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn conversation_state(&self) -> &BotState {
        &self.conversation_state
    }

    pub fn user_state(&self) -> &BotState {
        &self.user_state
    }

    /// A handler error ends the turn before state is saved.
    pub async fn run(
        &self,
        mut activity: Activity,
        sender: &dyn ChannelSender,
    ) -> Result<Vec<Activity>> {
        let start = Instant::now();
        activity.validate()?;

        if activity.timestamp.is_none() {
            activity.timestamp = Some(Utc::now());
        }

        debug!(
            activity_type = %activity.activity_type,
            channel_id = %activity.channel_id,
            conversation_id = %activity.conversation.id,
            "Turn started"
        );

        let state = TurnState {
            conversation: self.conversation_state.load(&activity).await?,
            user: self.user_state.load(&activity).await?,
        };
        let mut turn = TurnContext::new(activity, sender, state);

        for handler in &self.handlers {
            dispatch(handler.as_ref(), &mut turn).await?;
        }

        let (mut state, responses) = turn.into_parts();
        self.conversation_state
            .save_changes(&mut state.conversation, false)
            .await?;
        self.user_state.save_changes(&mut state.user, false).await?;

        record_counter("bot_turns_total", 1);
        record_counter("bot_activities_sent_total", responses.len() as u64);
        record_timing("bot_turn_duration_seconds", start.elapsed().as_secs_f64());

        info!(
            sent = responses.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Turn completed"
        );

        Ok(responses)
    }
}

async fn dispatch(handler: &dyn ActivityHandler, turn: &mut TurnContext<'_>) -> Result<()> {
    match turn.activity().activity_type {
        ActivityType::Message => handler.on_message(turn).await,
        ActivityType::ConversationUpdate if !turn.activity().members_added.is_empty() => {
            let members = turn.activity().members_added.clone();
            handler.on_members_added(&members, turn).await
        }
        ActivityType::ConversationUpdate | ActivityType::Other => {
            handler.on_unrecognized(turn).await
        }
    }
}
