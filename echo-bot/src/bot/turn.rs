use async_trait::async_trait;
use shared::{Activity, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::state::StateSnapshot;

/// Delivers outbound activities to the channel a turn came from.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send(&self, activity: &Activity) -> Result<()>;
}

/// Keeps outbound activities in memory, for channels that answer in the
/// response to the inbound request.
#[derive(Clone, Default)]
pub struct BufferedSender {
    sent: Arc<Mutex<Vec<Activity>>>,
}

impl BufferedSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Activity> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl ChannelSender for BufferedSender {
    async fn send(&self, activity: &Activity) -> Result<()> {
        self.sent.lock().await.push(activity.clone());
        Ok(())
    }
}

pub struct TurnState {
    pub conversation: StateSnapshot,
    pub user: StateSnapshot,
}

pub struct TurnContext<'a> {
    activity: Activity,
    sender: &'a dyn ChannelSender,
    pub state: TurnState,
    responses: Vec<Activity>,
}

impl<'a> TurnContext<'a> {
    pub fn new(activity: Activity, sender: &'a dyn ChannelSender, state: TurnState) -> Self {
        Self {
            activity,
            sender,
            state,
            responses: Vec::new(),
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub async fn send_activity(&mut self, activity: Activity) -> Result<()> {
        self.sender.send(&activity).await?;
        self.responses.push(activity);
        Ok(())
    }

    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<()> {
        let reply = self.activity.create_reply(text);
        self.send_activity(reply).await
    }

    pub fn into_parts(self) -> (TurnState, Vec<Activity>) {
        (self.state, self.responses)
    }
}
