//! Model types for conversations, groups, and messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a user. The current user's id lives in [`crate::StoreConfig`].
pub type UserId = String;

/// Identifier of a conversation or group. Conversations and groups share one
/// id space; [`ActiveTarget`] records which kind a selection resolved to.
pub type ChatId = String;

/// Sender id used for container-authored system messages.
pub const SYSTEM_SENDER: &str = "system";

/// Presence label mirrored onto one-to-one conversations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Presence {
    Online,
    Offline,
}

/// Message kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageKind {
    /// Authored by a user
    User,
    /// Authored by the container to narrate membership or deletion events.
    /// Excluded from last-message summaries.
    System,
}

/// Delivery status. Fixed at creation in the current scope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageStatus {
    Sent,
}

/// A message in a chat history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: UserId,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

/// Input for [`crate::ChatStore::add_message`]; id, timestamp, and status are
/// assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDraft {
    pub content: String,
    pub sender: UserId,
    pub kind: MessageKind,
}

impl MessageDraft {
    /// Draft for a regular user-authored message
    pub fn user(sender: impl Into<UserId>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: sender.into(),
            kind: MessageKind::User,
        }
    }
}

/// One-to-one conversation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ChatId,
    pub name: String,
    pub avatar: String,
    /// Id of the counterpart user; presence updates for that user mirror
    /// onto `status`.
    pub peer_id: UserId,
    pub status: Presence,
    pub last_message: Option<String>,
    /// Clock-face time (`%H:%M`) of the last summarized message
    pub last_message_time: Option<String>,
}

/// Group metadata and membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: ChatId,
    pub name: String,
    pub avatar: String,
    /// Member ids with set semantics; the current user is always seeded at
    /// creation.
    pub members: Vec<UserId>,
    pub creator: UserId,
    pub last_message: Option<String>,
    pub last_message_time: Option<String>,
}

impl Group {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// Which chat is currently displayed, fixed at selection time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActiveTarget {
    Conversation(ChatId),
    Group(ChatId),
}

impl ActiveTarget {
    pub fn chat_id(&self) -> &ChatId {
        match self {
            ActiveTarget::Conversation(id) | ActiveTarget::Group(id) => id,
        }
    }
}

/// Resolved view of the active chat, tagged with its kind for downstream
/// logic. Serializes with a `type` tag of `"private"` or `"group"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActiveChat {
    Private(Conversation),
    Group(Group),
}

impl ActiveChat {
    pub fn id(&self) -> &ChatId {
        match self {
            ActiveChat::Private(c) => &c.id,
            ActiveChat::Group(g) => &g.id,
        }
    }

    pub fn avatar(&self) -> &str {
        match self {
            ActiveChat::Private(c) => &c.avatar,
            ActiveChat::Group(g) => &g.avatar,
        }
    }
}

/// Known user profile for display-name and avatar resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_chat_serializes_with_kind_tag() {
        let chat = ActiveChat::Group(Group {
            id: "g1".to_string(),
            name: "Team".to_string(),
            avatar: "avatar".to_string(),
            members: vec!["me".to_string()],
            creator: "me".to_string(),
            last_message: None,
            last_message_time: None,
        });

        let json = serde_json::to_value(&chat).unwrap();
        assert_eq!(json["type"], "group");
        assert_eq!(json["name"], "Team");
    }

    #[test]
    fn test_message_roundtrip() {
        let msg = Message {
            id: "m1".to_string(),
            content: "hello".to_string(),
            sender: "alice".to_string(),
            kind: MessageKind::User,
            timestamp: Utc::now(),
            status: MessageStatus::Sent,
        };

        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, msg.id);
        assert_eq!(back.kind, MessageKind::User);
    }
}
