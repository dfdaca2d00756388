use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the chat state container.
///
/// Mutations that address an absent entity report it explicitly instead of
/// silently doing nothing, so callers can distinguish a no-op from success.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A message was added while no conversation or group is active
    #[error("no active conversation")]
    NoActiveChat,

    /// The addressed chat id matches neither a conversation nor a group
    #[error("chat not found: {0}")]
    ChatNotFound(String),

    /// The addressed group does not exist
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// The addressed message does not exist in the addressed chat's history
    #[error("message not found: {0}")]
    MessageNotFound(String),
}
