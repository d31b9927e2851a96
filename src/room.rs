//! Room entity
//!
//! A room is a bounded-membership, bounded-history message channel. Each
//! room carries its own locks, so operations on different rooms never
//! contend with each other; the server only serializes within one room.
//!
//! Invariants:
//! - membership never exceeds `max_users`
//! - history never exceeds [`MAX_HISTORY`] entries; the oldest entry is
//!   evicted first (FIFO)

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};

use crate::message::Message;
use crate::types::{RoomId, UserId};
use crate::user::User;

/// Maximum number of messages retained per room
pub const MAX_HISTORY: usize = 100;

/// Default membership capacity
pub const DEFAULT_CAPACITY: usize = 50;

/// Default window for [`Room::recent_messages`]
pub const DEFAULT_RECENT_COUNT: usize = 20;

/// A multi-user chat room
#[derive(Debug)]
pub struct Room {
    /// Unique identifier
    pub id: RoomId,
    /// Room name (mutable)
    name: RwLock<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Current members, keyed by user id
    members: RwLock<HashMap<UserId, Arc<User>>>,
    /// Bounded message history, oldest first
    history: Mutex<VecDeque<Message>>,
    /// Membership capacity
    max_users: usize,
}

impl Room {
    /// Create a room with the given name and membership capacity
    pub fn new(name: impl Into<String>, max_users: usize) -> Self {
        Self {
            id: RoomId::new(),
            name: RwLock::new(name.into()),
            created_at: Utc::now(),
            members: RwLock::new(HashMap::new()),
            history: Mutex::new(VecDeque::new()),
            max_users,
        }
    }

    /// Current room name
    pub fn name(&self) -> String {
        self.name.read().expect("name lock poisoned").clone()
    }

    /// Rename the room
    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write().expect("name lock poisoned") = name.into();
    }

    /// Membership capacity
    pub fn max_users(&self) -> usize {
        self.max_users
    }

    /// Add a user to the room
    ///
    /// Returns `false` when the room is at capacity or the user is already
    /// a member (idempotent); `true` only on actual insertion.
    pub fn add_user(&self, user: Arc<User>) -> bool {
        let mut members = self.members.write().expect("members lock poisoned");
        if members.len() >= self.max_users {
            return false;
        }
        match members.entry(user.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(user);
                true
            }
        }
    }

    /// Remove a member by id
    ///
    /// Returns `true` iff a member with that id was present and removed.
    pub fn remove_user(&self, user_id: &UserId) -> bool {
        self.members
            .write()
            .expect("members lock poisoned")
            .remove(user_id)
            .is_some()
    }

    /// Check whether a user is currently a member
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members
            .read()
            .expect("members lock poisoned")
            .contains_key(user_id)
    }

    /// Current member count
    pub fn member_count(&self) -> usize {
        self.members.read().expect("members lock poisoned").len()
    }

    /// Check whether the room is at capacity
    pub fn is_full(&self) -> bool {
        self.member_count() >= self.max_users
    }

    /// Append a message to the history, evicting the oldest past the cap
    ///
    /// Safe under concurrent senders: the history lock makes the append
    /// and the eviction one atomic step, and admitted order is the order
    /// later readers observe.
    pub fn add_message(&self, message: Message) {
        let mut history = self.history.lock().expect("history lock poisoned");
        history.push_back(message);
        if history.len() > MAX_HISTORY {
            history.pop_front();
        }
    }

    /// Snapshot of the last `count` messages (fewer if history is shorter)
    ///
    /// Callers usually want [`DEFAULT_RECENT_COUNT`].
    pub fn recent_messages(&self, count: usize) -> Vec<Message> {
        let history = self.history.lock().expect("history lock poisoned");
        let from = history.len().saturating_sub(count);
        history.iter().skip(from).cloned().collect()
    }

    /// Total number of retained messages
    pub fn history_len(&self) -> usize {
        self.history.lock().expect("history lock poisoned").len()
    }

    /// Snapshot of all members whose active flag is set
    pub fn active_users(&self) -> Vec<Arc<User>> {
        self.members
            .read()
            .expect("members lock poisoned")
            .values()
            .filter(|u| u.is_active())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(room: &Room, body: &str) -> Message {
        Message::chat("alice", body, room.id.clone()).unwrap()
    }

    #[test]
    fn test_room_creation() {
        let room = Room::new("general", DEFAULT_CAPACITY);
        assert_eq!(room.name(), "general");
        assert_eq!(room.member_count(), 0);
        assert_eq!(room.history_len(), 0);
        assert!(!room.is_full());
    }

    #[test]
    fn test_add_user_idempotent() {
        let room = Room::new("general", DEFAULT_CAPACITY);
        let alice = Arc::new(User::new("alice"));

        assert!(room.add_user(alice.clone()));
        assert!(!room.add_user(alice.clone()));
        assert_eq!(room.member_count(), 1);
    }

    #[test]
    fn test_capacity_rejection() {
        let room = Room::new("tiny", 2);
        assert!(room.add_user(Arc::new(User::new("alice"))));
        assert!(room.add_user(Arc::new(User::new("bob"))));
        assert!(room.is_full());

        assert!(!room.add_user(Arc::new(User::new("carol"))));
        assert_eq!(room.member_count(), 2);
    }

    #[test]
    fn test_remove_user() {
        let room = Room::new("general", DEFAULT_CAPACITY);
        let alice = Arc::new(User::new("alice"));
        room.add_user(alice.clone());

        assert!(room.remove_user(&alice.id));
        assert!(!room.remove_user(&alice.id));
        assert_eq!(room.member_count(), 0);
    }

    #[test]
    fn test_history_cap_fifo() {
        let room = Room::new("busy", DEFAULT_CAPACITY);
        for i in 0..(MAX_HISTORY + 10) {
            room.add_message(chat(&room, &format!("msg-{}", i)));
        }

        assert_eq!(room.history_len(), MAX_HISTORY);
        let all = room.recent_messages(MAX_HISTORY);
        // Oldest ten were evicted
        assert_eq!(all.first().unwrap().body, "msg-10");
        assert_eq!(all.last().unwrap().body, format!("msg-{}", MAX_HISTORY + 9));
    }

    #[test]
    fn test_recent_messages_snapshot() {
        let room = Room::new("general", DEFAULT_CAPACITY);
        for i in 0..5 {
            room.add_message(chat(&room, &format!("msg-{}", i)));
        }

        let recent = room.recent_messages(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].body, "msg-2");
        assert_eq!(recent[2].body, "msg-4");

        // Shorter history returns everything
        assert_eq!(room.recent_messages(DEFAULT_RECENT_COUNT).len(), 5);

        // The snapshot is independent of later appends
        room.add_message(chat(&room, "later"));
        assert_eq!(recent.len(), 3);
    }

    #[test]
    fn test_active_users_filter() {
        let room = Room::new("general", DEFAULT_CAPACITY);
        let alice = Arc::new(User::new("alice"));
        let bob = Arc::new(User::new("bob"));
        room.add_user(alice.clone());
        room.add_user(bob.clone());

        bob.set_active(false);

        let active = room.active_users();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, alice.id);
    }

    #[test]
    fn test_concurrent_appends_keep_history_consistent() {
        let room = Arc::new(Room::new("busy", DEFAULT_CAPACITY));
        let mut handles = Vec::new();
        for t in 0..4 {
            let room = room.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    let msg =
                        Message::chat(format!("user-{}", t), format!("m-{}", i), room.id.clone())
                            .unwrap();
                    room.add_message(msg);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 200 appends against a 100-cap: full, not corrupted
        assert_eq!(room.history_len(), MAX_HISTORY);

        // Per-sender order survives interleaving
        let all = room.recent_messages(MAX_HISTORY);
        for t in 0..4 {
            let author = format!("user-{}", t);
            let bodies: Vec<&str> = all
                .iter()
                .filter(|m| m.author == author)
                .map(|m| m.body.as_str())
                .collect();
            let mut sorted = bodies.clone();
            sorted.sort_by_key(|b| {
                b.trim_start_matches("m-").parse::<usize>().unwrap()
            });
            assert_eq!(bodies, sorted);
        }
    }

    #[test]
    fn test_message_requires_room_id() {
        let result = Message::chat("alice", "hi", RoomId("".to_string()));
        assert!(result.is_err());
    }
}
