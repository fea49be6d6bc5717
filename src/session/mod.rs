//! Room session: the client-owned handle to one live room connection.

use crate::error::{AppError, AppResult};
use crate::transport::{DataFrame, DeliveryKind, MembershipEvent, RoomTransport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Generate a unique session id.
fn generate_session_id() -> String {
    format!("{}.{}", std::process::id(), Uuid::new_v4().as_simple())
}

/// A live connection to one room, owned by the UI layer for the session's
/// duration. Wraps a [`RoomTransport`] with a connected guard so a publish
/// issued after [`RoomSession::disconnect`] fails with
/// [`AppError::Publish`] instead of racing the transport teardown.
///
/// The chat and roster components never hold a `RoomSession`; they take it
/// per call, so the same components can be re-driven with a new session
/// after a reconnect.
pub struct RoomSession {
    transport: Arc<dyn RoomTransport>,
    sid: String,
    connected: AtomicBool,
}

impl RoomSession {
    /// Open a session over an already-established transport connection.
    pub fn connect(transport: Arc<dyn RoomTransport>) -> Self {
        let sid = generate_session_id();
        info!(sid = %sid, identity = %transport.local_identity(), "session connected");
        Self {
            transport,
            sid,
            connected: AtomicBool::new(true),
        }
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Identity of the local participant, as encoded in the access token.
    pub fn local_identity(&self) -> &str {
        self.transport.local_identity()
    }

    /// Enumerate the remote participants currently joined. Accurate at call
    /// time; callers re-enumerate on every membership event rather than
    /// caching.
    pub async fn remote_participants(&self) -> Vec<String> {
        self.transport.remote_participants().await
    }

    /// Publish a data payload to the room. No retry on failure; retry, if
    /// any, is the transport's responsibility.
    pub async fn publish_data(&self, payload: Vec<u8>, kind: DeliveryKind) -> AppResult<()> {
        if !self.is_connected() {
            return Err(AppError::Publish("session not connected".to_string()));
        }
        self.transport.publish_data(payload, kind).await
    }

    /// Register for inbound data payloads. Drop the receiver to deregister.
    pub async fn subscribe_data(&self) -> mpsc::UnboundedReceiver<DataFrame> {
        self.transport.subscribe_data().await
    }

    /// Register for join/leave notifications. Drop the receiver to deregister.
    pub async fn subscribe_membership(&self) -> mpsc::UnboundedReceiver<MembershipEvent> {
        self.transport.subscribe_membership().await
    }

    /// Tear the session down. Subsequent publishes fail; registered
    /// receivers stop yielding once the transport deregisters them.
    pub async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.transport.disconnect().await;
            info!(sid = %self.sid, "session disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::InProcessHub;

    #[tokio::test]
    async fn publish_on_disconnected_session_fails_without_reaching_transport() {
        let hub = InProcessHub::new();
        let alice = hub.join("standup", "alice").await.unwrap();
        let bob = hub.join("standup", "bob").await.unwrap();
        let mut bob_rx = bob.subscribe_data().await;

        let session = RoomSession::connect(Arc::new(alice));
        session.disconnect().await;

        let err = session
            .publish_data(b"late".to_vec(), DeliveryKind::Reliable)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Publish(_)));
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let hub = InProcessHub::new();
        let alice = hub.join("standup", "alice").await.unwrap();
        let session = RoomSession::connect(Arc::new(alice));
        session.disconnect().await;
        session.disconnect().await;
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn session_exposes_transport_identity() {
        let hub = InProcessHub::new();
        let alice = hub.join("standup", "alice").await.unwrap();
        let session = RoomSession::connect(Arc::new(alice));
        assert_eq!(session.local_identity(), "alice");
        assert!(session.is_connected());
    }
}
