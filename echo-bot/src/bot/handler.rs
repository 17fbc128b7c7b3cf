use async_trait::async_trait;
use shared::{ChannelAccount, Result};

use super::turn::TurnContext;

/// Per-event hooks invoked by the dispatcher, once per handler per turn.
#[async_trait]
pub trait ActivityHandler: Send + Sync {
    async fn on_message(&self, _turn: &mut TurnContext<'_>) -> Result<()> {
        Ok(())
    }

    async fn on_members_added(
        &self,
        _members: &[ChannelAccount],
        _turn: &mut TurnContext<'_>,
    ) -> Result<()> {
        Ok(())
    }

    async fn on_unrecognized(&self, _turn: &mut TurnContext<'_>) -> Result<()> {
        Ok(())
    }
}
