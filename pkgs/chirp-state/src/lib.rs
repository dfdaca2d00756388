//! Chirp State - in-memory conversation state for chat UIs
//!
//! This crate provides the client-side state container behind a chat user
//! interface: conversation and group lists, per-chat message histories,
//! typing/online presence, and the active-chat selector. There is no
//! networking and no persistence; the embedding presentation layer reads
//! derived views and drives mutations through the operation set.
//!
//! # Architecture
//!
//! The container is organized around one store and a few narrow collaborators:
//!
//! - **ChatStore**: all mutation operations and derived views
//! - **PresenceTracker**: typing/online set membership
//! - **UserDirectory**: known profiles for display-name resolution and
//!   deterministic avatar derivation
//! - **Notifier**: injected callback for platform notifications
//! - **ChatEvent**: per-mutation change feed for UI subscribers
//!
//! # Key behaviors
//!
//! - Message histories are keyed by chat id; switching the active chat never
//!   destroys history
//! - The active selection is a tagged target fixed at selection time, with
//!   conversation lookup taking precedence over groups on ambiguous ids
//! - Absent targets are explicit errors, never silent no-ops
//! - Last-message summaries skip system messages and tombstones
//!
//! # Example Usage
//!
//! ```rust
//! use chirp_state::{ChatStore, MessageDraft};
//!
//! let mut store = ChatStore::new();
//! let group = store.create_group("Team", None);
//! store.set_active_conversation(&group.id);
//!
//! let message = store.add_message(MessageDraft::user("1", "Hello!")).unwrap();
//! assert_eq!(store.active_messages().last().unwrap().id, message.id);
//! ```

pub mod error;
pub mod events;
pub mod models;
pub mod notify;
pub mod presence;
pub mod roster;
pub mod store;

pub use error::{Error, Result};
pub use events::ChatEvent;
pub use models::{
    ActiveChat, ActiveTarget, ChatId, Conversation, Group, Message, MessageDraft, MessageKind,
    MessageStatus, Presence, UserId, UserProfile, SYSTEM_SENDER,
};
pub use notify::Notifier;
pub use presence::PresenceTracker;
pub use roster::{initials_avatar_url, UserDirectory};
pub use store::{
    format_clock_time, ChatStore, StoreConfig, DELETED_MESSAGE_TEXT, EMPTY_HISTORY_TEXT,
};
