//! The data-publish seam between this crate and the hosted media provider.
//!
//! Everything above this module talks to a [`RoomTransport`]; the in-process
//! implementation in [`memory`] stands in for the provider SDK in local
//! wiring and tests. A production adapter implements the same trait.

pub mod memory;

pub use memory::{InProcessHub, InProcessRoom};

use crate::error::AppResult;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Delivery mode for a data publish. Chat always uses [`DeliveryKind::Reliable`];
/// `Lossy` exists because the seam models the provider's primitive, not chat policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryKind {
    /// Ordered, retransmitted by the transport.
    Reliable,
    /// Best-effort, may drop or reorder.
    Lossy,
}

/// An inbound data-channel payload with its transport-supplied origin.
/// `origin` is `None` when the transport could not attribute the payload.
#[derive(Debug, Clone)]
pub struct DataFrame {
    pub payload: Vec<u8>,
    pub origin: Option<String>,
}

/// Join/leave notification. Consumers treat these as triggers to re-enumerate
/// the participant set, not as incremental diffs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    Joined(String),
    Left(String),
}

/// A live connection to one room, as exposed by the media provider.
///
/// Subscriptions return plain receivers; dropping the receiver deregisters
/// the handler (the transport prunes closed slots on the next emit).
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// Identity of the local participant on this connection.
    fn local_identity(&self) -> &str;

    /// Snapshot of the currently joined remote participants. Excludes the
    /// local participant.
    async fn remote_participants(&self) -> Vec<String>;

    /// Publish a payload to every other participant in the room.
    async fn publish_data(&self, payload: Vec<u8>, kind: DeliveryKind) -> AppResult<()>;

    /// Register for inbound data payloads.
    async fn subscribe_data(&self) -> mpsc::UnboundedReceiver<DataFrame>;

    /// Register for join/leave notifications.
    async fn subscribe_membership(&self) -> mpsc::UnboundedReceiver<MembershipEvent>;

    /// Leave the room and stop delivering notifications.
    async fn disconnect(&self);
}
