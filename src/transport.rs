//! Transport abstraction for message delivery
//!
//! The [`Transport`] trait is the only boundary between the coordination
//! core and whatever actually moves bytes. Two simulated implementations
//! model different protocol latencies, and [`LoggingTransport`] wraps any
//! implementation with structured logging without changing its contract.
//!
//! Delivery is best-effort: a failed send is reported through the
//! returned `Result`, never by panicking across the boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::error::TransportError;
use crate::types::UserId;

/// Delivery capability contract
///
/// Both send operations are asynchronous and report success or failure
/// independently of the caller's other work.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a rendered message to a single recipient
    async fn send_one(&self, recipient: &UserId, rendered: &str) -> Result<(), TransportError>;

    /// Deliver a rendered message to many recipients (fan-out)
    async fn send_many(
        &self,
        recipients: &[UserId],
        rendered: &str,
    ) -> Result<(), TransportError>;

    /// Synchronous liveness probe
    fn is_connected(&self) -> bool;
}

/// Simulated WebSocket-style transport (low latency)
#[derive(Debug)]
pub struct WebSocketTransport {
    connected: AtomicBool,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
        }
    }

    /// Mark the transport connected or disconnected
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send_one(&self, recipient: &UserId, rendered: &str) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        debug!("[WebSocket] sent to {}: {}", recipient, rendered);
        Ok(())
    }

    async fn send_many(
        &self,
        recipients: &[UserId],
        rendered: &str,
    ) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        debug!(
            "[WebSocket] broadcast to {} recipients: {}",
            recipients.len(),
            rendered
        );
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

/// Simulated long-polling HTTP transport (higher latency)
#[derive(Debug)]
pub struct LongPollTransport {
    connected: AtomicBool,
}

impl LongPollTransport {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
        }
    }

    /// Mark the transport connected or disconnected
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

impl Default for LongPollTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for LongPollTransport {
    async fn send_one(&self, recipient: &UserId, rendered: &str) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        debug!("[LongPoll] sent to {}: {}", recipient, rendered);
        Ok(())
    }

    async fn send_many(
        &self,
        recipients: &[UserId],
        rendered: &str,
    ) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        debug!(
            "[LongPoll] broadcast to {} recipients: {}",
            recipients.len(),
            rendered
        );
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

/// Logging decorator over any [`Transport`]
///
/// Forwards every call to the inner transport, logging the outcome. The
/// `Result` passes through unchanged so the caller still observes the
/// delivery outcome; the decorator only guarantees the failure is logged
/// and nothing escapes the boundary except that `Result`.
pub struct LoggingTransport {
    inner: Box<dyn Transport>,
}

impl LoggingTransport {
    pub fn new(inner: Box<dyn Transport>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for LoggingTransport {
    async fn send_one(&self, recipient: &UserId, rendered: &str) -> Result<(), TransportError> {
        match self.inner.send_one(recipient, rendered).await {
            Ok(()) => {
                info!("message sent to {}", recipient);
                Ok(())
            }
            Err(e) => {
                error!("failed to send message to {}: {}", recipient, e);
                Err(e)
            }
        }
    }

    async fn send_many(
        &self,
        recipients: &[UserId],
        rendered: &str,
    ) -> Result<(), TransportError> {
        match self.inner.send_many(recipients, rendered).await {
            Ok(()) => {
                info!("message broadcast to {} recipients", recipients.len());
                Ok(())
            }
            Err(e) => {
                error!("failed to broadcast message: {}", e);
                Err(e)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }
}
