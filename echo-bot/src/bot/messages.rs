use chrono::{DateTime, Utc};

pub const NAME_PROMPT: &str = "What is your name?";

pub const WELCOME_TEXT: &str = "Welcome to ASSR G4 Bot. Type anything to get started.!";

pub fn format_thanks_message(name: &str) -> String {
    format!("Thanks {}. To see conversation data, type anything.", name)
}

pub fn format_echo_message(name: &str, text: &str) -> String {
    format!("{} sent: {}", name, text)
}

pub fn format_received_at(timestamp: &str) -> String {
    format!("Message received at: {}", timestamp)
}

pub fn format_received_from(channel_id: &str) -> String {
    format!("Message received from: {}", channel_id)
}

/// Renders like an en-US locale string, e.g. `5/1/2024, 1:05:09 PM`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
