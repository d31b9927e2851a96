//! User entity
//!
//! A registered user. Users are shared as `Arc<User>` between the server
//! registry and room membership maps, so mutable state (username, activity)
//! uses interior mutability and all methods take `&self`.
//!
//! Username uniqueness is enforced only at registration time; a later
//! rename is not re-checked. There is no deregistration: once registered,
//! a user stays in the server registry for the process lifetime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::types::UserId;

/// A registered chat user
#[derive(Debug)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name (mutable, see module docs)
    username: RwLock<String>,
    /// Registration time, immutable
    pub joined_at: DateTime<Utc>,
    /// Time of the last message sent
    last_activity: RwLock<DateTime<Utc>>,
    /// Whether the user counts as active for delivery fan-out
    active: AtomicBool,
}

impl User {
    /// Create a new active user with the given display name
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: RwLock::new(username.into()),
            joined_at: now,
            last_activity: RwLock::new(now),
            active: AtomicBool::new(true),
        }
    }

    /// Current display name
    pub fn username(&self) -> String {
        self.username.read().expect("username lock poisoned").clone()
    }

    /// Rename the user (uniqueness is not re-checked)
    pub fn set_username(&self, username: impl Into<String>) {
        *self.username.write().expect("username lock poisoned") = username.into();
    }

    /// Refresh the activity timestamp and re-assert the active flag
    pub fn touch(&self) {
        *self.last_activity.write().expect("activity lock poisoned") = Utc::now();
        self.active.store(true, Ordering::Relaxed);
    }

    /// Time of the last activity
    pub fn last_activity(&self) -> DateTime<Utc> {
        *self.last_activity.read().expect("activity lock poisoned")
    }

    /// Whether the user is currently active
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Set the active flag
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }
}
