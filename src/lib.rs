//! Multi-Room Chat Coordination Engine
//!
//! An in-process chat core: user registration, bounded-membership rooms
//! with bounded message history, event fan-out to subscribers, and
//! asynchronous best-effort delivery through a pluggable transport.
//!
//! # Features
//! - User registration with case-insensitive unique names
//! - Rooms with a membership cap and a 100-message FIFO history
//! - Room chat, SYSTEM join/leave notices, and private messages
//! - Tagged [`ChatEvent`] stream with per-subscriber failure isolation
//! - Swappable [`Transport`] implementations plus a logging decorator
//!
//! # Architecture
//! [`ChatServer`] owns the room and user registries; each [`Room`] owns
//! its own membership and history locks, so rooms never contend with
//! each other. Registry mutation completes synchronously before an
//! operation returns; only transport delivery runs on spawned tasks,
//! observed through the returned `JoinHandle`.
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use chat_engine::{ChatClient, ChatServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = ChatServer::global();
//!     server.subscribe(Arc::new(ChatClient::new()));
//!
//!     let alice = server.register_user("alice").unwrap();
//!     let room = server.create_room_default("general").unwrap();
//!     server.join_room(&alice, &room);
//!     server.send_message(&alice, &room, "hello").await.unwrap();
//! }
//! ```

pub mod client;
pub mod error;
pub mod events;
pub mod message;
pub mod room;
pub mod server;
pub mod transport;
pub mod types;
pub mod user;

// Re-export main types for convenience
pub use client::ChatClient;
pub use error::{ChatError, TransportError};
pub use events::{ChatEvent, EventSink, SinkError};
pub use message::{Message, MessageKind};
pub use room::{Room, DEFAULT_CAPACITY, DEFAULT_RECENT_COUNT, MAX_HISTORY};
pub use server::ChatServer;
pub use transport::{LoggingTransport, LongPollTransport, Transport, WebSocketTransport};
pub use types::{MessageId, RoomId, UserId};
pub use user::User;
