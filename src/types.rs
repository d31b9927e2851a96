//! Basic type definitions for the chat engine
//!
//! Provides newtype wrappers for type safety:
//! - `UserId`: unique user identifier
//! - `RoomId`: unique room identifier (with a `private` sentinel)
//! - `MessageId`: unique message identifier
//!
//! All three render as the short 8-hex-char form of a UUID v4, which keeps
//! them readable in logs and console output while staying unique in practice.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a short (8 hex chars) unique id
fn short_id() -> String {
    let mut buf = Uuid::encode_buffer();
    let simple = Uuid::new_v4().simple().encode_lower(&mut buf);
    simple[..8].to_string()
}

/// Unique user identifier (newtype pattern)
///
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new random user ID
    pub fn new() -> Self {
        Self(short_id())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique room identifier
///
/// The reserved id `private` tags private messages that belong to no room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

/// Sentinel room id carried by private messages
const PRIVATE_ROOM_ID: &str = "private";

impl RoomId {
    /// Create a new random room ID
    pub fn new() -> Self {
        Self(short_id())
    }

    /// The sentinel id for private messages (not tied to a real room)
    pub fn private() -> Self {
        Self(PRIVATE_ROOM_ID.to_string())
    }

    /// Check whether this is the private-message sentinel
    pub fn is_private(&self) -> bool {
        self.0 == PRIVATE_ROOM_ID
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique message identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Create a new random message ID
    pub fn new() -> Self {
        Self(short_id())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_unique() {
        let id1 = UserId::new();
        let id2 = UserId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_length() {
        assert_eq!(UserId::new().0.len(), 8);
        assert_eq!(RoomId::new().0.len(), 8);
        assert_eq!(MessageId::new().0.len(), 8);
    }

    #[test]
    fn test_private_sentinel() {
        let private = RoomId::private();
        assert!(private.is_private());
        assert_eq!(private.to_string(), "private");
        assert!(!RoomId::new().is_private());
    }

    #[test]
    fn test_user_id_as_map_key() {
        use std::collections::HashMap;
        let id = UserId::new();
        let mut map = HashMap::new();
        map.insert(id.clone(), "alice");
        assert_eq!(map[&id], "alice");
    }
}
