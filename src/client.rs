//! Console client adapter
//!
//! One [`EventSink`] implementation that filters the server's event
//! stream down to what is relevant for a single user's session and
//! renders it for the console. A pure consumer: it never mutates server
//! state.

use std::sync::Mutex;

use crate::events::{ChatEvent, EventSink, SinkError};
use crate::message::MessageKind;
use crate::types::{RoomId, UserId};

/// Event consumer for one interactive session
///
/// Tracks which user and room the session currently belongs to; events
/// outside that scope are dropped silently.
#[derive(Debug, Default)]
pub struct ChatClient {
    current_user: Mutex<Option<UserId>>,
    current_room: Mutex<Option<RoomId>>,
}

impl ChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user this session belongs to
    pub fn set_current_user(&self, user_id: Option<UserId>) {
        *self.current_user.lock().expect("user lock poisoned") = user_id;
    }

    /// Set the room this session is watching
    pub fn set_current_room(&self, room_id: Option<RoomId>) {
        *self.current_room.lock().expect("room lock poisoned") = room_id;
    }

    /// Render an event if it is relevant to this session
    ///
    /// Relevant means: messages for the current room or any private
    /// message, join/leave notices for the current room from other users,
    /// and every room creation.
    pub fn render_for(&self, event: &ChatEvent) -> Option<String> {
        let current_user = self.current_user.lock().expect("user lock poisoned").clone();
        let current_room = self.current_room.lock().expect("room lock poisoned").clone();

        match event {
            ChatEvent::MessageReceived { message } => {
                let in_current_room = current_room.as_ref() == Some(&message.room_id);
                if in_current_room || message.kind == MessageKind::Private {
                    Some(message.to_string())
                } else {
                    None
                }
            }
            ChatEvent::UserJoined {
                user_id,
                username,
                room_id,
            } => {
                if current_room.as_ref() == Some(room_id) && current_user.as_ref() != Some(user_id)
                {
                    Some(format!("User {} joined the room", username))
                } else {
                    None
                }
            }
            ChatEvent::UserLeft {
                user_id,
                username,
                room_id,
            } => {
                if current_room.as_ref() == Some(room_id) && current_user.as_ref() != Some(user_id)
                {
                    Some(format!("User {} left the room", username))
                } else {
                    None
                }
            }
            ChatEvent::RoomCreated { name, .. } => Some(format!("New room created: {}", name)),
        }
    }
}

impl EventSink for ChatClient {
    fn on_event(&self, event: &ChatEvent) -> Result<(), SinkError> {
        if let Some(line) = self.render_for(event) {
            println!("{}", line);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn test_room_created_always_rendered() {
        let client = ChatClient::new();
        let event = ChatEvent::RoomCreated {
            room_id: RoomId::new(),
            name: "general".to_string(),
        };
        assert_eq!(
            client.render_for(&event),
            Some("New room created: general".to_string())
        );
    }

    #[test]
    fn test_message_filtered_by_room() {
        let client = ChatClient::new();
        let room = RoomId::new();
        let other = RoomId::new();
        client.set_current_room(Some(room.clone()));

        let here = ChatEvent::MessageReceived {
            message: Message::chat("alice", "hi", room).unwrap(),
        };
        let elsewhere = ChatEvent::MessageReceived {
            message: Message::chat("alice", "hi", other).unwrap(),
        };

        assert!(client.render_for(&here).is_some());
        assert!(client.render_for(&elsewhere).is_none());
    }

    #[test]
    fn test_private_message_always_rendered() {
        let client = ChatClient::new();
        // No current room at all
        let event = ChatEvent::MessageReceived {
            message: Message::private("bob", "psst").unwrap(),
        };
        let line = client.render_for(&event).unwrap();
        assert!(line.contains("PRIVATE from bob: psst"));
    }

    #[test]
    fn test_own_join_not_echoed() {
        let client = ChatClient::new();
        let me = UserId::new();
        let room = RoomId::new();
        client.set_current_user(Some(me.clone()));
        client.set_current_room(Some(room.clone()));

        let own = ChatEvent::UserJoined {
            user_id: me,
            username: "alice".to_string(),
            room_id: room.clone(),
        };
        assert!(client.render_for(&own).is_none());

        let other = ChatEvent::UserJoined {
            user_id: UserId::new(),
            username: "bob".to_string(),
            room_id: room,
        };
        assert_eq!(
            client.render_for(&other),
            Some("User bob joined the room".to_string())
        );
    }

    #[test]
    fn test_leave_outside_current_room_dropped() {
        let client = ChatClient::new();
        client.set_current_room(Some(RoomId::new()));

        let event = ChatEvent::UserLeft {
            user_id: UserId::new(),
            username: "bob".to_string(),
            room_id: RoomId::new(),
        };
        assert!(client.render_for(&event).is_none());
    }
}
