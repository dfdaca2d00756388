//! Event types pushed to the embedding presentation layer

use serde::{Deserialize, Serialize};

use crate::models::{ActiveTarget, ChatId, Group, Message, UserId};

/// State change notifications for UI subscribers.
///
/// Every mutation on [`crate::ChatStore`] emits exactly one event describing
/// what changed, so a presentation layer can re-render incrementally instead
/// of diffing collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatEvent {
    // Message events
    MessageAdded { chat_id: ChatId, message: Message },
    MessageRemoved { chat_id: ChatId, message_id: String },
    MessageRedacted { chat_id: ChatId, message_id: String },

    // Group lifecycle events
    GroupCreated { group: Group },
    MemberJoined { group_id: ChatId, user_id: UserId },
    MemberLeft { group_id: ChatId, user_id: UserId },

    // Selection events
    ActiveChatChanged { target: Option<ActiveTarget> },

    // Presence events
    TypingChanged { user_id: UserId, typing: bool },
    OnlineChanged { user_id: UserId, online: bool },
}
