//! Chat store - single source of truth for conversations, groups, message
//! histories, presence, and the active-chat selector
//!
//! All mutations go through named operations so derived views and the
//! last-message summaries stay consistent. Callers never mutate the
//! collections directly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::events::ChatEvent;
use crate::models::{
    ActiveChat, ActiveTarget, ChatId, Conversation, Group, Message, MessageDraft, MessageKind,
    MessageStatus, Presence, UserId, SYSTEM_SENDER,
};
use crate::notify::Notifier;
use crate::presence::PresenceTracker;
use crate::roster::{initials_avatar_url, UserDirectory};

/// Tombstone content written by [`ChatStore::delete_message_for_everyone`]
pub const DELETED_MESSAGE_TEXT: &str = "This message was deleted";

/// Summary placeholder when a chat's history holds no qualifying message
pub const EMPTY_HISTORY_TEXT: &str = "No messages";

/// Format a timestamp as the clock-face string shown next to chat summaries
pub fn format_clock_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M").to_string()
}

/// Configuration for the chat store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Id of the user operating this client
    pub current_user: UserId,

    /// Title passed to the notifier for incoming messages
    pub notification_title: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            current_user: "1".to_string(),
            notification_title: "New Message".to_string(),
        }
    }
}

/// In-memory conversation state container.
///
/// Owns the conversation and group lists, per-chat message histories, the
/// presence sets, the add-members selection buffer, and the active-chat
/// selector. Every mutation emits a [`ChatEvent`] on the channel handed out
/// by [`ChatStore::take_event_receiver`].
pub struct ChatStore {
    config: StoreConfig,
    conversations: Vec<Conversation>,
    groups: Vec<Group>,
    /// Message history keyed by chat id; the active list is a derived view
    histories: HashMap<ChatId, Vec<Message>>,
    active: Option<ActiveTarget>,
    selected_users: Vec<UserId>,
    presence: PresenceTracker,
    directory: UserDirectory,
    notifier: Option<Box<dyn Notifier + Send>>,
    window_focused: bool,
    event_sender: tokio_mpsc::UnboundedSender<ChatEvent>,
    event_receiver: Option<tokio_mpsc::UnboundedReceiver<ChatEvent>>,
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let (event_sender, event_receiver) = tokio_mpsc::unbounded_channel();

        Self {
            config,
            conversations: Vec::new(),
            groups: Vec::new(),
            histories: HashMap::new(),
            active: None,
            selected_users: Vec::new(),
            presence: PresenceTracker::new(),
            directory: UserDirectory::new(),
            notifier: None,
            window_focused: true,
            event_sender,
            event_receiver: Some(event_receiver),
        }
    }

    /// Take the event receiver. Yields `Some` exactly once; the embedding
    /// layer drains it to react to state changes.
    pub fn take_event_receiver(&mut self) -> Option<tokio_mpsc::UnboundedReceiver<ChatEvent>> {
        self.event_receiver.take()
    }

    /// Inject the platform notification callback. Only inject one when the
    /// platform capability is present and permitted.
    pub fn set_notifier(&mut self, notifier: Box<dyn Notifier + Send>) {
        self.notifier = Some(notifier);
    }

    /// Mirror of the host surface's focus state; incoming messages notify
    /// only while unfocused.
    pub fn set_window_focused(&mut self, focused: bool) {
        self.window_focused = focused;
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut UserDirectory {
        &mut self.directory
    }

    // ---- Reads ----

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn active_target(&self) -> Option<&ActiveTarget> {
        self.active.as_ref()
    }

    /// Resolved view of the active chat, tagged with its kind. Recomputed on
    /// every read.
    pub fn active_conversation(&self) -> Option<ActiveChat> {
        match &self.active {
            Some(ActiveTarget::Conversation(id)) => {
                self.conversation(id).cloned().map(ActiveChat::Private)
            }
            Some(ActiveTarget::Group(id)) => self.group(id).cloned().map(ActiveChat::Group),
            None => None,
        }
    }

    /// History of the active chat, empty when nothing is active
    pub fn active_messages(&self) -> &[Message] {
        self.active
            .as_ref()
            .map(|target| self.history(target.chat_id()))
            .unwrap_or(&[])
    }

    /// History of any chat by id
    pub fn history(&self, chat_id: &str) -> &[Message] {
        self.histories
            .get(chat_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Current add-members selection buffer
    pub fn selected_users(&self) -> &[UserId] {
        &self.selected_users
    }

    // ---- Seeding ----

    /// Add or replace a conversation. Conversations are created by the
    /// embedder (seed data); the store only mutates their summaries and
    /// presence labels afterwards.
    pub fn upsert_conversation(&mut self, conversation: Conversation) {
        debug!("Upserting conversation: {}", conversation.id);

        if let Some(existing) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation.id)
        {
            *existing = conversation;
        } else {
            self.conversations.push(conversation);
        }
    }

    // ---- Messages ----

    /// Append a message to the active chat's history.
    ///
    /// Assigns a fresh unique id, the creation timestamp, and status `Sent`,
    /// then updates the chat's last-message summary. Fires the injected
    /// notifier when the sender is not the current user and the window is
    /// unfocused. Fails with [`Error::NoActiveChat`] when nothing is active.
    pub fn add_message(&mut self, draft: MessageDraft) -> Result<Message> {
        let target = self.active.clone().ok_or(Error::NoActiveChat)?;

        let message = self.push_message(target.chat_id().clone(), draft);

        if message.sender != self.config.current_user && !self.window_focused {
            if let Some(notifier) = &self.notifier {
                let icon = self.active_conversation().map(|c| c.avatar().to_string());
                notifier.notify(
                    &self.config.notification_title,
                    &message.content,
                    icon.as_deref(),
                );
            }
        }

        Ok(message)
    }

    /// Remove a message from a chat's history for this client only, then
    /// recompute the trailing summary.
    pub fn delete_message_for_me(&mut self, chat_id: &str, message_id: &str) -> Result<()> {
        let history = self.history_mut(chat_id, message_id)?;

        let index = history
            .iter()
            .position(|m| m.id == message_id)
            .ok_or_else(|| Error::MessageNotFound(message_id.to_string()))?;

        history.remove(index);
        info!("Deleted message {} from chat {} locally", message_id, chat_id);

        self.emit(ChatEvent::MessageRemoved {
            chat_id: chat_id.to_string(),
            message_id: message_id.to_string(),
        });
        self.update_last_message(chat_id);
        Ok(())
    }

    /// Replace a message with its tombstone: fixed deletion marker content,
    /// retagged as a system message with a refreshed timestamp. The slot in
    /// the sequence is retained. Remote propagation is out of scope.
    pub fn delete_message_for_everyone(&mut self, chat_id: &str, message_id: &str) -> Result<()> {
        let history = self.history_mut(chat_id, message_id)?;

        let message = history
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| Error::MessageNotFound(message_id.to_string()))?;

        message.content = DELETED_MESSAGE_TEXT.to_string();
        message.kind = MessageKind::System;
        message.sender = SYSTEM_SENDER.to_string();
        message.timestamp = Utc::now();
        info!("Redacted message {} in chat {}", message_id, chat_id);

        self.emit(ChatEvent::MessageRedacted {
            chat_id: chat_id.to_string(),
            message_id: message_id.to_string(),
        });
        self.update_last_message(chat_id);
        Ok(())
    }

    // ---- Groups ----

    /// Create a group with the current user as sole member and creator.
    ///
    /// When no avatar is given, one is derived deterministically from the
    /// name.
    pub fn create_group(&mut self, name: &str, avatar: Option<String>) -> Group {
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            avatar: avatar.unwrap_or_else(|| initials_avatar_url(name)),
            members: vec![self.config.current_user.clone()],
            creator: self.config.current_user.clone(),
            last_message: Some("Group created".to_string()),
            last_message_time: Some(format_clock_time(Utc::now())),
        };

        info!("Created group '{}' ({})", group.name, group.id);
        self.groups.push(group.clone());
        self.emit(ChatEvent::GroupCreated {
            group: group.clone(),
        });
        group
    }

    /// Join a group as the current user. Idempotent: returns `Ok(false)`
    /// without a system message when already a member.
    pub fn join_group(&mut self, group_id: &str) -> Result<bool> {
        let current_user = self.config.current_user.clone();

        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| Error::GroupNotFound(group_id.to_string()))?;

        if group.is_member(&current_user) {
            return Ok(false);
        }

        group.members.push(current_user.clone());
        info!("Joined group {}", group_id);

        self.emit(ChatEvent::MemberJoined {
            group_id: group_id.to_string(),
            user_id: current_user,
        });
        self.push_system_message(group_id.to_string(), "You joined the group");
        Ok(true)
    }

    /// Leave a group as the current user.
    ///
    /// Removes the membership unconditionally, narrates the departure, and
    /// clears the active selection when the left group was active.
    pub fn leave_group(&mut self, group_id: &str) -> Result<()> {
        let current_user = self.config.current_user.clone();

        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| Error::GroupNotFound(group_id.to_string()))?;

        group.members.retain(|m| m != &current_user);
        info!("Left group {}", group_id);

        self.emit(ChatEvent::MemberLeft {
            group_id: group_id.to_string(),
            user_id: current_user,
        });
        self.push_system_message(group_id.to_string(), "You left the group");

        if self.active.as_ref().map(|t| t.chat_id().as_str()) == Some(group_id) {
            self.clear_active();
        }
        Ok(())
    }

    /// Add members to a group, skipping ids that are already members.
    ///
    /// A system message narrates each newly added member with a resolvable
    /// directory profile. The selection buffer is always cleared afterwards,
    /// even when the group is not found. Returns the ids actually added.
    pub fn add_group_members(
        &mut self,
        group_id: &str,
        user_ids: &[UserId],
    ) -> Result<Vec<UserId>> {
        let result = self.add_members_inner(group_id, user_ids);
        self.selected_users.clear();
        result
    }

    fn add_members_inner(&mut self, group_id: &str, user_ids: &[UserId]) -> Result<Vec<UserId>> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| Error::GroupNotFound(group_id.to_string()))?;

        let new_members: Vec<UserId> = user_ids
            .iter()
            .filter(|id| !group.is_member(id))
            .cloned()
            .collect();

        group.members.extend(new_members.iter().cloned());
        info!("Added {} member(s) to group {}", new_members.len(), group_id);

        for user_id in &new_members {
            self.emit(ChatEvent::MemberJoined {
                group_id: group_id.to_string(),
                user_id: user_id.clone(),
            });

            if let Some(name) = self.directory.display_name(user_id).map(str::to_string) {
                let text = format!("{} has joined the group", name);
                self.push_system_message(group_id.to_string(), &text);
            }
        }

        Ok(new_members)
    }

    // ---- Selection ----

    /// Toggle a user in the add-members selection buffer
    pub fn toggle_user_selection(&mut self, user_id: &str) {
        if let Some(index) = self.selected_users.iter().position(|u| u == user_id) {
            self.selected_users.remove(index);
        } else {
            self.selected_users.push(user_id.to_string());
        }
    }

    /// Switch the active chat.
    ///
    /// The id is resolved once at selection time, conversations taking
    /// precedence over groups when it exists in both spaces. The selection
    /// buffer is cleared; per-chat histories survive the switch. Returns the
    /// resolved target, `None` when the id matched nothing.
    pub fn set_active_conversation(&mut self, id: &str) -> Option<ActiveTarget> {
        let target = if self.conversations.iter().any(|c| c.id == id) {
            Some(ActiveTarget::Conversation(id.to_string()))
        } else if self.groups.iter().any(|g| g.id == id) {
            Some(ActiveTarget::Group(id.to_string()))
        } else {
            None
        };

        debug!("Active chat -> {:?}", target);
        self.active = target.clone();
        self.selected_users.clear();
        self.emit(ChatEvent::ActiveChatChanged {
            target: target.clone(),
        });
        target
    }

    /// Clear the active selection and the selection buffer
    pub fn clear_active(&mut self) {
        self.active = None;
        self.selected_users.clear();
        self.emit(ChatEvent::ActiveChatChanged { target: None });
    }

    // ---- Presence ----

    pub fn set_typing(&mut self, user_id: &str, typing: bool) {
        if self.presence.set_typing(user_id, typing) {
            self.emit(ChatEvent::TypingChanged {
                user_id: user_id.to_string(),
                typing,
            });
        }
    }

    /// Update a user's online status and mirror it onto the status label of
    /// every conversation whose counterpart is that user.
    pub fn set_user_online(&mut self, user_id: &str, online: bool) {
        if self.presence.set_online(user_id, online) {
            self.emit(ChatEvent::OnlineChanged {
                user_id: user_id.to_string(),
                online,
            });
        }

        let status = if online {
            Presence::Online
        } else {
            Presence::Offline
        };
        for conversation in self
            .conversations
            .iter_mut()
            .filter(|c| c.peer_id == user_id)
        {
            conversation.status = status;
        }
    }

    pub fn is_user_typing(&self, user_id: &str) -> bool {
        self.presence.is_typing(user_id)
    }

    pub fn is_user_online(&self, user_id: &str) -> bool {
        self.presence.is_online(user_id)
    }

    // ---- Internal ----

    /// Mutable history of a chat, distinguishing an unknown chat id from a
    /// chat whose history simply lacks the message.
    fn history_mut(&mut self, chat_id: &str, message_id: &str) -> Result<&mut Vec<Message>> {
        let chat_exists = self.conversation(chat_id).is_some() || self.group(chat_id).is_some();

        self.histories.get_mut(chat_id).ok_or_else(|| {
            if chat_exists {
                Error::MessageNotFound(message_id.to_string())
            } else {
                Error::ChatNotFound(chat_id.to_string())
            }
        })
    }

    /// Append a message to a chat's history and refresh that chat's summary
    fn push_message(&mut self, chat_id: ChatId, draft: MessageDraft) -> Message {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            content: draft.content,
            sender: draft.sender,
            kind: draft.kind,
            timestamp: Utc::now(),
            status: MessageStatus::Sent,
        };

        debug!("Message {} -> chat {}", message.id, chat_id);
        self.histories
            .entry(chat_id.clone())
            .or_default()
            .push(message.clone());

        self.write_summary(
            &chat_id,
            message.content.clone(),
            format_clock_time(message.timestamp),
        );
        self.emit(ChatEvent::MessageAdded {
            chat_id,
            message: message.clone(),
        });
        message
    }

    fn push_system_message(&mut self, chat_id: ChatId, content: &str) {
        self.push_message(
            chat_id,
            MessageDraft {
                content: content.to_string(),
                sender: SYSTEM_SENDER.to_string(),
                kind: MessageKind::System,
            },
        );
    }

    /// Recompute a chat's summary from the most recent non-system message,
    /// falling back to a placeholder that preserves the prior time.
    fn update_last_message(&mut self, chat_id: &str) {
        let last = self
            .histories
            .get(chat_id)
            .and_then(|history| {
                history
                    .iter()
                    .rev()
                    .find(|m| m.kind != MessageKind::System)
            })
            .map(|m| (m.content.clone(), format_clock_time(m.timestamp)));

        match last {
            Some((content, time)) => self.write_summary(chat_id, content, time),
            None => {
                // Keep the prior time; only the content resets
                if let Some(c) = self.conversations.iter_mut().find(|c| c.id == chat_id) {
                    c.last_message = Some(EMPTY_HISTORY_TEXT.to_string());
                } else if let Some(g) = self.groups.iter_mut().find(|g| g.id == chat_id) {
                    g.last_message = Some(EMPTY_HISTORY_TEXT.to_string());
                }
            }
        }
    }

    /// Write a last-message summary onto the matching conversation or group
    fn write_summary(&mut self, chat_id: &str, content: String, time: String) {
        if let Some(c) = self.conversations.iter_mut().find(|c| c.id == chat_id) {
            c.last_message = Some(content);
            c.last_message_time = Some(time);
        } else if let Some(g) = self.groups.iter_mut().find(|g| g.id == chat_id) {
            g.last_message = Some(content);
            g.last_message_time = Some(time);
        }
    }

    fn emit(&self, event: ChatEvent) {
        // Receiver may not have been taken or may be gone; state stays
        // authoritative either way
        let _ = self.event_sender.send(event);
    }
}
