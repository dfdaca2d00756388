//! Presence tracker for typing and online indicator sets

use std::collections::HashSet;

use tracing::debug;

use crate::models::UserId;

/// Tracks which users are typing and which are online.
///
/// Both collections have set semantics: membership only, no ordering, no
/// duplicates. Setting a flag that already holds is a no-op.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    typing: HashSet<UserId>,
    online: HashSet<UserId>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a user from the typing set. Returns whether membership
    /// actually changed.
    pub fn set_typing(&mut self, user_id: &str, typing: bool) -> bool {
        let changed = if typing {
            self.typing.insert(user_id.to_string())
        } else {
            self.typing.remove(user_id)
        };

        if changed {
            debug!("Typing changed: {} -> {}", user_id, typing);
        }
        changed
    }

    /// Add or remove a user from the online set. Returns whether membership
    /// actually changed.
    pub fn set_online(&mut self, user_id: &str, online: bool) -> bool {
        let changed = if online {
            self.online.insert(user_id.to_string())
        } else {
            self.online.remove(user_id)
        };

        if changed {
            debug!("Online changed: {} -> {}", user_id, online);
        }
        changed
    }

    pub fn is_typing(&self, user_id: &str) -> bool {
        self.typing.contains(user_id)
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        self.online.contains(user_id)
    }
}
