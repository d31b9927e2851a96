//! Message model
//!
//! A message is immutable once constructed: author, body, owning room and
//! kind are validated up front, the timestamp is set at construction.
//! Rendering for transport delivery and console output goes through the
//! `Display` impl.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::types::{MessageId, RoomId};

/// Message classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Ordinary room chat
    Chat,
    /// Server-generated room notice (join/leave)
    System,
    /// Direct user-to-user message, not tied to a room
    Private,
}

/// A single chat message
///
/// `room_id` is the owning room, or the `private` sentinel for direct
/// messages (see [`RoomId::private`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message id
    pub id: MessageId,
    /// Display name of the author (`System` for notices)
    pub author: String,
    /// Message body
    pub body: String,
    /// Owning room id, or the private sentinel
    pub room_id: RoomId,
    /// Message classification
    pub kind: MessageKind,
    /// Creation time, immutable
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Construct a message of the given kind
    ///
    /// Fails with [`ChatError::Validation`] if author, body, or room id
    /// is empty or blank.
    pub fn new(
        author: impl Into<String>,
        body: impl Into<String>,
        room_id: RoomId,
        kind: MessageKind,
    ) -> Result<Self, ChatError> {
        let author = author.into();
        let body = body.into();
        if author.trim().is_empty() {
            return Err(ChatError::Validation("message author"));
        }
        if body.trim().is_empty() {
            return Err(ChatError::Validation("message body"));
        }
        if room_id.0.trim().is_empty() {
            return Err(ChatError::Validation("message room id"));
        }
        Ok(Self {
            id: MessageId::new(),
            author,
            body,
            room_id,
            kind,
            sent_at: Utc::now(),
        })
    }

    /// Construct an ordinary chat message
    pub fn chat(
        author: impl Into<String>,
        body: impl Into<String>,
        room_id: RoomId,
    ) -> Result<Self, ChatError> {
        Self::new(author, body, room_id, MessageKind::Chat)
    }

    /// Construct a server-generated system notice for a room
    pub fn system(body: impl Into<String>, room_id: RoomId) -> Result<Self, ChatError> {
        Self::new("System", body, room_id, MessageKind::System)
    }

    /// Construct a private message (carries the sentinel room id)
    pub fn private(
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, ChatError> {
        Self::new(author, body, RoomId::private(), MessageKind::Private)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let time = self.sent_at.format("%H:%M:%S");
        match self.kind {
            MessageKind::System => write!(f, "[{}] SYSTEM: {}", time, self.body),
            MessageKind::Private => {
                write!(f, "[{}] PRIVATE from {}: {}", time, self.author, self.body)
            }
            MessageKind::Chat => write!(f, "[{}] {}: {}", time, self.author, self.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_fields() {
        let room = RoomId::new();
        let msg = Message::chat("alice", "hello", room.clone()).unwrap();
        assert_eq!(msg.author, "alice");
        assert_eq!(msg.body, "hello");
        assert_eq!(msg.room_id, room);
        assert_eq!(msg.kind, MessageKind::Chat);
    }

    #[test]
    fn test_blank_author_rejected() {
        let result = Message::chat("  ", "hello", RoomId::new());
        assert!(matches!(result, Err(ChatError::Validation(_))));
    }

    #[test]
    fn test_blank_body_rejected() {
        let result = Message::chat("alice", "", RoomId::new());
        assert!(matches!(result, Err(ChatError::Validation(_))));
    }

    #[test]
    fn test_private_carries_sentinel_room() {
        let msg = Message::private("alice", "psst").unwrap();
        assert!(msg.room_id.is_private());
        assert_eq!(msg.kind, MessageKind::Private);
    }

    #[test]
    fn test_render_system() {
        let msg = Message::system("alice joined the room", RoomId::new()).unwrap();
        let rendered = msg.to_string();
        assert!(rendered.contains("SYSTEM: alice joined the room"));
        assert!(rendered.starts_with('['));
    }

    #[test]
    fn test_render_private() {
        let msg = Message::private("bob", "psst").unwrap();
        assert!(msg.to_string().contains("PRIVATE from bob: psst"));
    }

    #[test]
    fn test_render_chat() {
        let msg = Message::chat("alice", "hi", RoomId::new()).unwrap();
        assert!(msg.to_string().contains("] alice: hi"));
    }
}
