//! Name-collection flow as a pure transition over
//! `(UserProfile.name, ConversationData.prompted_for_user_name)`.
//!
//! | Phase          | Condition                  | Reply          |
//! |----------------|----------------------------|----------------|
//! | `PromptForName`| no name, not prompted      | name prompt    |
//! | `CaptureName`  | no name, prompted          | thanks message |
//! | `Echo`         | name known                 | echo           |

use shared::{Activity, ConversationData, UserProfile};

use super::messages::{
    format_echo_message, format_received_at, format_received_from, format_thanks_message,
    format_timestamp, NAME_PROMPT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    PromptForName,
    CaptureName,
    Echo,
}

impl FlowPhase {
    pub fn of(profile: &UserProfile, conversation: &ConversationData) -> Self {
        match (profile.known_name(), conversation.prompted_for_user_name) {
            (Some(_), _) => FlowPhase::Echo,
            (None, true) => FlowPhase::CaptureName,
            (None, false) => FlowPhase::PromptForName,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOutcome {
    pub phase: FlowPhase,
    pub profile: UserProfile,
    pub conversation: ConversationData,
    pub reply: String,
    pub log_lines: Vec<String>,
}

pub fn advance(
    mut profile: UserProfile,
    mut conversation: ConversationData,
    inbound: &Activity,
) -> FlowOutcome {
    let phase = FlowPhase::of(&profile, &conversation);
    let text = inbound.text_or_empty();
    let mut log_lines = Vec::new();

    let reply = match phase {
        FlowPhase::PromptForName => {
            conversation.prompted_for_user_name = true;
            NAME_PROMPT.to_string()
        }
        FlowPhase::CaptureName => {
            profile.name = Some(text.to_string());
            conversation.prompted_for_user_name = false;
            format_thanks_message(text)
        }
        FlowPhase::Echo => {
            let name = profile.known_name().unwrap_or_default();
            let timestamp = inbound.timestamp.as_ref().map(format_timestamp);
            let echo = format_echo_message(name, text);

            log_lines.push(echo.clone());
            log_lines.push(format_received_at(timestamp.as_deref().unwrap_or_default()));
            log_lines.push(format_received_from(&inbound.channel_id));

            conversation.timestamp = timestamp;
            conversation.channel_id = Some(inbound.channel_id.clone());
            echo
        }
    };

    FlowOutcome {
        phase,
        profile,
        conversation,
        reply,
        log_lines,
    }
}
