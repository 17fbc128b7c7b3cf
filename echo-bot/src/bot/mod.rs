mod dispatcher;
mod echo_bot;
pub mod flow;
mod handler;
pub mod messages;
mod turn;

pub use dispatcher::TurnDispatcher;
pub use echo_bot::{EchoBot, CONVERSATION_DATA_PROPERTY, USER_PROFILE_PROPERTY};
pub use handler::ActivityHandler;
pub use turn::{BufferedSender, ChannelSender, TurnContext, TurnState};

use crate::state::{BotState, Storage};
use std::sync::Arc;

/// Dispatcher with the echo bot as its only handler, both scopes on `storage`.
pub fn build_dispatcher(storage: Arc<dyn Storage>) -> TurnDispatcher {
    let conversation_state = BotState::conversation(storage.clone());
    let user_state = BotState::user(storage);
    let bot = EchoBot::new(&conversation_state, &user_state);

    TurnDispatcher::new(conversation_state, user_state).with_handler(Arc::new(bot))
}
