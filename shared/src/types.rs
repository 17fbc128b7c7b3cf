use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    #[default]
    Message,
    ConversationUpdate,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActivityType::Message => "message",
            ActivityType::ConversationUpdate => "conversationUpdate",
            ActivityType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationAccount {
    pub id: String,
}

impl ConversationAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One inbound or outbound conversation event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub from: ChannelAccount,
    #[serde(default)]
    pub recipient: ChannelAccount,
    #[serde(default)]
    pub conversation: ConversationAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speak: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_added: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
}

impl Activity {
    pub fn message(
        channel_id: impl Into<String>,
        conversation_id: impl Into<String>,
        from: ChannelAccount,
        recipient: ChannelAccount,
        text: impl Into<String>,
    ) -> Self {
        Self {
            activity_type: ActivityType::Message,
            id: Some(Uuid::new_v4().to_string()),
            timestamp: Some(Utc::now()),
            channel_id: channel_id.into(),
            from,
            recipient,
            conversation: ConversationAccount::new(conversation_id),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn members_added(
        channel_id: impl Into<String>,
        conversation_id: impl Into<String>,
        from: ChannelAccount,
        recipient: ChannelAccount,
        members: Vec<ChannelAccount>,
    ) -> Self {
        Self {
            activity_type: ActivityType::ConversationUpdate,
            id: Some(Uuid::new_v4().to_string()),
            timestamp: Some(Utc::now()),
            channel_id: channel_id.into(),
            from,
            recipient,
            conversation: ConversationAccount::new(conversation_id),
            members_added: members,
            ..Default::default()
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Builds an outbound message addressed back to the sender of `self`.
    pub fn create_reply(&self, text: impl Into<String>) -> Activity {
        Activity {
            activity_type: ActivityType::Message,
            id: Some(Uuid::new_v4().to_string()),
            timestamp: Some(Utc::now()),
            channel_id: self.channel_id.clone(),
            from: self.recipient.clone(),
            recipient: self.from.clone(),
            conversation: self.conversation.clone(),
            text: Some(text.into()),
            reply_to_id: self.id.clone(),
            ..Default::default()
        }
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_id.trim().is_empty() {
            return Err(ServiceError::InvalidActivity(
                "channelId is required".to_string(),
            ));
        }

        if self.conversation.id.trim().is_empty() {
            return Err(ServiceError::InvalidActivity(
                "conversation.id is required".to_string(),
            ));
        }

        if self.from.id.trim().is_empty() {
            return Err(ServiceError::InvalidActivity("from.id is required".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserProfile {
    /// Empty names count as unknown, mirroring a falsy name check.
    pub fn known_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationData {
    #[serde(default)]
    pub prompted_for_user_name: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}
