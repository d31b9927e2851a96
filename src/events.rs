//! Chat event definitions and the subscriber contract
//!
//! State changes are published as a tagged [`ChatEvent`] enum to every
//! subscribed [`EventSink`]. Sinks are registered with the server and
//! compared by `Arc` identity; a sink that fails is isolated (logged and
//! skipped), never affecting other sinks or the operation that emitted
//! the event.

use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::types::{RoomId, UserId};

/// Error type a sink may return from a notification
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// A chat-relevant state change
///
/// For joins and leaves the membership-change event is always emitted
/// before the matching system-message event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was appended to a room history (or sent privately)
    MessageReceived { message: Message },
    /// A user became a member of a room
    UserJoined {
        user_id: UserId,
        username: String,
        room_id: RoomId,
    },
    /// A user left a room
    UserLeft {
        user_id: UserId,
        username: String,
        room_id: RoomId,
    },
    /// A new room was created
    RoomCreated { room_id: RoomId, name: String },
}

/// A subscriber notified of chat events
///
/// Implementations must tolerate being called from any task; the server
/// holds sinks as `Arc<dyn EventSink>` and notifies them synchronously
/// with the triggering operation.
pub trait EventSink: Send + Sync {
    /// Handle one event
    ///
    /// Returning `Err` marks this notification as failed; the failure is
    /// logged by the dispatcher and does not propagate.
    fn on_event(&self, event: &ChatEvent) -> Result<(), SinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_tagged() {
        let event = ChatEvent::RoomCreated {
            room_id: RoomId::new(),
            name: "general".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"room_created\""));
        assert!(json.contains("\"name\":\"general\""));
    }

    #[test]
    fn test_message_event_roundtrip_kind() {
        let msg = Message::system("alice joined the room", RoomId::new()).unwrap();
        let event = ChatEvent::MessageReceived { message: msg };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"message_received\""));
        assert!(json.contains("\"kind\":\"system\""));
    }
}
