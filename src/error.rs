//! Error types for the chat engine
//!
//! Defines the coordination-core error taxonomy and transport errors.
//! Uses thiserror for ergonomic error definitions.
//!
//! Unknown user/room ids on join/leave/send are deliberately NOT errors:
//! those operations signal failure with a `false` result so interactive
//! callers can branch without error handling.

use thiserror::Error;

/// Coordination-core errors
///
/// Covers input validation and registration failures. Lookup misses are
/// reported as `false` results by the operations themselves.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A required string input was empty or blank
    #[error("{0} cannot be empty")]
    Validation(&'static str),

    /// Username already registered (case-insensitive match)
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Internal invariant failure (e.g. generated-id collision)
    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Transport-level delivery errors
///
/// Captured and logged by the transport decorator; the server converts
/// them into a `false` delivery result rather than propagating.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying transport is not connected
    #[error("transport disconnected")]
    Disconnected,

    /// Delivery to one or more recipients failed
    #[error("send failed: {0}")]
    SendFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = ChatError::Validation("room name");
        assert_eq!(err.to_string(), "room name cannot be empty");
    }

    #[test]
    fn test_username_taken_message() {
        let err = ChatError::UsernameTaken("alice".to_string());
        assert_eq!(err.to_string(), "username already taken: alice");
    }
}
