//! ChatServer coordination core
//!
//! Owns the authoritative room and user registries, serializes mutation,
//! publishes [`ChatEvent`]s to subscribed sinks, and drives the transport
//! for message delivery.
//!
//! Registry and room mutation always completes synchronously before an
//! operation returns; only transport delivery runs on a spawned task. The
//! send operations hand back a [`JoinHandle`] the caller may await for
//! the delivery outcome or drop to fire-and-forget; the message is
//! already recorded in history either way.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::ChatError;
use crate::events::{ChatEvent, EventSink};
use crate::message::Message;
use crate::room::{Room, DEFAULT_CAPACITY};
use crate::transport::{LoggingTransport, Transport, WebSocketTransport};
use crate::types::{RoomId, UserId};
use crate::user::User;

/// Process-wide server instance, constructed exactly once
static GLOBAL: OnceLock<ChatServer> = OnceLock::new();

/// A delivery handle that resolves without touching the transport
fn completed(value: bool) -> JoinHandle<bool> {
    tokio::spawn(async move { value })
}

/// The multi-room chat coordination core
///
/// Cheap to share behind `&` references: all state is interior-mutable
/// and every operation takes `&self`.
pub struct ChatServer {
    /// All rooms, keyed by id. Rooms are never deleted.
    rooms: RwLock<HashMap<RoomId, Arc<Room>>>,
    /// All registered users, keyed by id. Users are never deregistered.
    users: RwLock<HashMap<UserId, Arc<User>>>,
    /// Subscribed event sinks, compared by Arc identity
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
    /// Delivery mechanism, fixed for the server's lifetime
    transport: Arc<dyn Transport>,
}

impl ChatServer {
    /// Create a server with an explicit transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        info!("chat server initialized");
        Self {
            rooms: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            sinks: RwLock::new(Vec::new()),
            transport,
        }
    }

    /// The process-wide instance
    ///
    /// Initialized on first access with a logging-wrapped WebSocket
    /// transport; every later call returns the same instance.
    pub fn global() -> &'static ChatServer {
        GLOBAL.get_or_init(|| {
            let transport = LoggingTransport::new(Box::new(WebSocketTransport::new()));
            ChatServer::new(Arc::new(transport))
        })
    }

    // --- subscriptions ---

    /// Subscribe a sink to all future events (idempotent by identity)
    pub fn subscribe(&self, sink: Arc<dyn EventSink>) {
        let mut sinks = self.sinks.write().expect("sinks lock poisoned");
        if !sinks.iter().any(|s| Arc::ptr_eq(s, &sink)) {
            sinks.push(sink);
            info!("event sink subscribed");
        }
    }

    /// Remove a sink by identity (no-op when not subscribed)
    pub fn unsubscribe(&self, sink: &Arc<dyn EventSink>) {
        let mut sinks = self.sinks.write().expect("sinks lock poisoned");
        let before = sinks.len();
        sinks.retain(|s| !Arc::ptr_eq(s, sink));
        if sinks.len() < before {
            info!("event sink unsubscribed");
        }
    }

    /// Notify every subscribed sink, isolating per-sink failures
    fn emit(&self, event: &ChatEvent) {
        let snapshot: Vec<Arc<dyn EventSink>> =
            self.sinks.read().expect("sinks lock poisoned").clone();
        for sink in snapshot {
            if let Err(e) = sink.on_event(event) {
                warn!("event sink failed, skipping: {}", e);
            }
        }
    }

    // --- registration and rooms ---

    /// Create a room and return its id
    ///
    /// Fails with [`ChatError::Validation`] on a blank name. A collision
    /// on the generated id is an internal failure that in practice never
    /// occurs.
    pub fn create_room(
        &self,
        name: impl Into<String>,
        max_users: usize,
    ) -> Result<RoomId, ChatError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ChatError::Validation("room name"));
        }

        let room = Arc::new(Room::new(name.clone(), max_users));
        let room_id = room.id.clone();
        {
            let mut rooms = self.rooms.write().expect("rooms lock poisoned");
            match rooms.entry(room_id.clone()) {
                Entry::Occupied(_) => return Err(ChatError::Internal("room id collision")),
                Entry::Vacant(slot) => {
                    slot.insert(room);
                }
            }
        }

        self.emit(&ChatEvent::RoomCreated {
            room_id: room_id.clone(),
            name: name.clone(),
        });
        info!("chat room created: {} (id: {})", name, room_id);
        Ok(room_id)
    }

    /// Create a room with the default capacity (50)
    pub fn create_room_default(&self, name: impl Into<String>) -> Result<RoomId, ChatError> {
        self.create_room(name, DEFAULT_CAPACITY)
    }

    /// Register a new user and return their id
    ///
    /// Fails with [`ChatError::Validation`] on a blank name and
    /// [`ChatError::UsernameTaken`] when the name matches an existing
    /// user case-insensitively. Uniqueness is checked only here, never
    /// again on rename.
    pub fn register_user(&self, username: impl Into<String>) -> Result<UserId, ChatError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(ChatError::Validation("username"));
        }

        let mut users = self.users.write().expect("users lock poisoned");
        let lowered = username.to_lowercase();
        if users.values().any(|u| u.username().to_lowercase() == lowered) {
            return Err(ChatError::UsernameTaken(username));
        }

        let user = Arc::new(User::new(username.clone()));
        let user_id = user.id.clone();
        users.insert(user_id.clone(), user);
        drop(users);

        info!("user registered: {} (id: {})", username, user_id);
        Ok(user_id)
    }

    // --- membership ---

    /// Add a user to a room
    ///
    /// Returns `false` when either id is unknown or the room rejects the
    /// add (full, or already a member). On success records a SYSTEM join
    /// notice and emits `UserJoined` followed by `MessageReceived`.
    pub fn join_room(&self, user_id: &UserId, room_id: &RoomId) -> bool {
        let Some(user) = self.user(user_id) else {
            return false;
        };
        let Some(room) = self.room(room_id) else {
            return false;
        };
        if !room.add_user(user.clone()) {
            return false;
        }

        let username = user.username();
        match Message::system(format!("{} joined the room", username), room.id.clone()) {
            Ok(note) => {
                room.add_message(note.clone());
                self.emit(&ChatEvent::UserJoined {
                    user_id: user.id.clone(),
                    username: username.clone(),
                    room_id: room.id.clone(),
                });
                self.emit(&ChatEvent::MessageReceived { message: note });
            }
            Err(e) => warn!("failed to record join notice: {}", e),
        }

        info!("user {} joined room {}", username, room.name());
        true
    }

    /// Remove a user from a room
    ///
    /// Returns `false` when either id is unknown or the user is not a
    /// member. On success records a SYSTEM leave notice and emits
    /// `UserLeft` followed by `MessageReceived`.
    pub fn leave_room(&self, user_id: &UserId, room_id: &RoomId) -> bool {
        let Some(user) = self.user(user_id) else {
            return false;
        };
        let Some(room) = self.room(room_id) else {
            return false;
        };
        if !room.remove_user(user_id) {
            return false;
        }

        let username = user.username();
        match Message::system(format!("{} left the room", username), room.id.clone()) {
            Ok(note) => {
                room.add_message(note.clone());
                self.emit(&ChatEvent::UserLeft {
                    user_id: user.id.clone(),
                    username: username.clone(),
                    room_id: room.id.clone(),
                });
                self.emit(&ChatEvent::MessageReceived { message: note });
            }
            Err(e) => warn!("failed to record leave notice: {}", e),
        }

        info!("user {} left room {}", username, room.name());
        true
    }

    // --- message delivery ---

    /// Send a chat message to a room
    ///
    /// The returned handle resolves to `false` immediately when the user
    /// or room is unknown, the sender is not a member, or the content is
    /// blank. Otherwise the message is appended to history and announced
    /// before this method returns; the handle then resolves to the
    /// transport broadcast outcome. History keeps the message regardless
    /// of delivery.
    pub fn send_message(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
        content: impl Into<String>,
    ) -> JoinHandle<bool> {
        let Some(user) = self.user(user_id) else {
            return completed(false);
        };
        let Some(room) = self.room(room_id) else {
            return completed(false);
        };
        if !room.is_member(user_id) {
            return completed(false);
        }

        let message = match Message::chat(user.username(), content, room.id.clone()) {
            Ok(m) => m,
            Err(e) => {
                warn!("rejected message from {}: {}", user.username(), e);
                return completed(false);
            }
        };

        room.add_message(message.clone());
        user.touch();
        self.emit(&ChatEvent::MessageReceived {
            message: message.clone(),
        });

        let recipients: Vec<UserId> = room
            .active_users()
            .iter()
            .map(|u| u.id.clone())
            .collect();
        let rendered = message.to_string();
        let username = user.username();
        let room_name = room.name();
        let transport = self.transport.clone();

        tokio::spawn(async move {
            match transport.send_many(&recipients, &rendered).await {
                Ok(()) => {
                    info!("message sent by {} in room {}", username, room_name);
                    true
                }
                Err(e) => {
                    error!(
                        "error sending message: {} -> {}: {}",
                        username, room_name, e
                    );
                    false
                }
            }
        })
    }

    /// Send a private message to a user by name
    ///
    /// The recipient must be an *active* user whose name matches
    /// case-insensitively; the first match wins. Private messages carry
    /// the `private` sentinel room id and are stored in no room history.
    /// The handle resolves to the transport outcome.
    pub fn send_private_message(
        &self,
        from_user_id: &UserId,
        to_username: &str,
        content: impl Into<String>,
    ) -> JoinHandle<bool> {
        let Some(sender) = self.user(from_user_id) else {
            return completed(false);
        };

        let lowered = to_username.to_lowercase();
        let recipient = {
            let users = self.users.read().expect("users lock poisoned");
            users
                .values()
                .find(|u| u.is_active() && u.username().to_lowercase() == lowered)
                .cloned()
        };
        let Some(recipient) = recipient else {
            return completed(false);
        };

        let message = match Message::private(sender.username(), content) {
            Ok(m) => m,
            Err(e) => {
                warn!("rejected private message from {}: {}", sender.username(), e);
                return completed(false);
            }
        };

        let rendered = message.to_string();
        let from_name = sender.username();
        let to_name = recipient.username();
        let recipient_id = recipient.id.clone();
        let transport = self.transport.clone();

        tokio::spawn(async move {
            match transport.send_one(&recipient_id, &rendered).await {
                Ok(()) => {
                    info!("private message sent: {} -> {}", from_name, to_name);
                    true
                }
                Err(e) => {
                    error!(
                        "error sending private message: {} -> {}: {}",
                        from_name, to_name, e
                    );
                    false
                }
            }
        })
    }

    // --- read-only accessors ---

    /// Snapshot of all rooms
    pub fn rooms(&self) -> Vec<Arc<Room>> {
        self.rooms
            .read()
            .expect("rooms lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Fetch a room by id
    pub fn room(&self, room_id: &RoomId) -> Option<Arc<Room>> {
        self.rooms
            .read()
            .expect("rooms lock poisoned")
            .get(room_id)
            .cloned()
    }

    /// Fetch a user by id
    pub fn user(&self, user_id: &UserId) -> Option<Arc<User>> {
        self.users
            .read()
            .expect("users lock poisoned")
            .get(user_id)
            .cloned()
    }

    /// Snapshot of all users with the active flag set
    pub fn active_users(&self) -> Vec<Arc<User>> {
        self.users
            .read()
            .expect("users lock poisoned")
            .values()
            .filter(|u| u.is_active())
            .cloned()
            .collect()
    }

    /// Total number of rooms
    pub fn room_count(&self) -> usize {
        self.rooms.read().expect("rooms lock poisoned").len()
    }

    /// Total number of registered users
    pub fn user_count(&self) -> usize {
        self.users.read().expect("users lock poisoned").len()
    }
}
