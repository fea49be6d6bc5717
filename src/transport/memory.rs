//! In-process room transport: reliable fan-out between participants in the
//! same process. One hub hosts many rooms; each joined participant holds an
//! [`InProcessRoom`] handle implementing [`RoomTransport`].

use crate::error::{AppError, AppResult};
use crate::transport::{DataFrame, DeliveryKind, MembershipEvent, RoomTransport};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

#[derive(Default)]
struct MemberSlots {
    data: Vec<mpsc::UnboundedSender<DataFrame>>,
    membership: Vec<mpsc::UnboundedSender<MembershipEvent>>,
}

#[derive(Default)]
struct RoomState {
    members: HashMap<String, MemberSlots>,
}

impl RoomState {
    /// Send a membership event to every member except `skip`, pruning
    /// deregistered (dropped) receivers.
    fn notify_membership(&mut self, event: &MembershipEvent, skip: &str) {
        for (identity, slots) in self.members.iter_mut() {
            if identity == skip {
                continue;
            }
            slots.membership.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

/// In-memory router for rooms. Cheap to clone; clones share the same rooms.
#[derive(Clone, Default)]
pub struct InProcessHub {
    rooms: Arc<Mutex<HashMap<String, RoomState>>>,
}

impl InProcessHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join `identity` to `room`, notifying the members already present.
    /// The joiner receives no event for its own arrival; it is expected to
    /// enumerate the room once after joining.
    pub async fn join(&self, room: &str, identity: &str) -> AppResult<InProcessRoom> {
        let mut rooms = self.rooms.lock().await;
        let state = rooms.entry(room.to_string()).or_default();
        if state.members.contains_key(identity) {
            return Err(AppError::Validation(format!(
                "identity {} already joined room {}",
                identity, room
            )));
        }
        state.notify_membership(&MembershipEvent::Joined(identity.to_string()), identity);
        state.members.insert(identity.to_string(), MemberSlots::default());
        info!(room = %room, identity = %identity, "joined room");
        Ok(InProcessRoom {
            hub: self.clone(),
            room: room.to_string(),
            identity: identity.to_string(),
            connected: Arc::new(AtomicBool::new(true)),
        })
    }
}

/// One participant's connection to a room on an [`InProcessHub`].
pub struct InProcessRoom {
    hub: InProcessHub,
    room: String,
    identity: String,
    connected: Arc<AtomicBool>,
}

#[async_trait]
impl RoomTransport for InProcessRoom {
    fn local_identity(&self) -> &str {
        &self.identity
    }

    async fn remote_participants(&self) -> Vec<String> {
        let rooms = self.hub.rooms.lock().await;
        let mut names: Vec<String> = rooms
            .get(&self.room)
            .map(|state| {
                state
                    .members
                    .keys()
                    .filter(|name| name.as_str() != self.identity)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Deliver to every other member of the room. The publisher never
    /// receives its own payload back. In-process delivery is ordered either
    /// way; `kind` only changes behavior in a network adapter.
    async fn publish_data(&self, payload: Vec<u8>, kind: DeliveryKind) -> AppResult<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(AppError::Publish("transport disconnected".to_string()));
        }
        let mut rooms = self.hub.rooms.lock().await;
        let state = rooms
            .get_mut(&self.room)
            .ok_or_else(|| AppError::Publish(format!("room {} is gone", self.room)))?;
        let frame = DataFrame {
            payload,
            origin: Some(self.identity.clone()),
        };
        for (identity, slots) in state.members.iter_mut() {
            if identity.as_str() == self.identity {
                continue;
            }
            slots.data.retain(|tx| tx.send(frame.clone()).is_ok());
        }
        debug!(room = %self.room, identity = %self.identity, kind = ?kind, "data published");
        Ok(())
    }

    async fn subscribe_data(&self) -> mpsc::UnboundedReceiver<DataFrame> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut rooms = self.hub.rooms.lock().await;
        if let Some(slots) = rooms
            .get_mut(&self.room)
            .and_then(|state| state.members.get_mut(&self.identity))
        {
            slots.data.push(tx);
        }
        rx
    }

    async fn subscribe_membership(&self) -> mpsc::UnboundedReceiver<MembershipEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut rooms = self.hub.rooms.lock().await;
        if let Some(slots) = rooms
            .get_mut(&self.room)
            .and_then(|state| state.members.get_mut(&self.identity))
        {
            slots.membership.push(tx);
        }
        rx
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            let mut rooms = self.hub.rooms.lock().await;
            if let Some(state) = rooms.get_mut(&self.room) {
                state.members.remove(&self.identity);
                state.notify_membership(&MembershipEvent::Left(self.identity.clone()), &self.identity);
                if state.members.is_empty() {
                    rooms.remove(&self.room);
                }
            }
            info!(room = %self.room, identity = %self.identity, "left room");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fan_out_skips_the_publisher() {
        let hub = InProcessHub::new();
        let alice = hub.join("standup", "alice").await.unwrap();
        let bob = hub.join("standup", "bob").await.unwrap();

        let mut alice_rx = alice.subscribe_data().await;
        let mut bob_rx = bob.subscribe_data().await;

        alice
            .publish_data(b"hello".to_vec(), DeliveryKind::Reliable)
            .await
            .unwrap();

        let frame = bob_rx.recv().await.unwrap();
        assert_eq!(frame.payload, b"hello");
        assert_eq!(frame.origin.as_deref(), Some("alice"));
        assert!(alice_rx.try_recv().is_err(), "publisher must not see its own payload");
    }

    #[tokio::test]
    async fn join_notifies_existing_members_only() {
        let hub = InProcessHub::new();
        let alice = hub.join("standup", "alice").await.unwrap();
        let mut alice_events = alice.subscribe_membership().await;

        let bob = hub.join("standup", "bob").await.unwrap();
        let mut bob_events = bob.subscribe_membership().await;

        assert_eq!(
            alice_events.recv().await,
            Some(MembershipEvent::Joined("bob".to_string()))
        );
        assert!(bob_events.try_recv().is_err(), "joiner gets no event for itself");
    }

    #[tokio::test]
    async fn disconnect_emits_left_and_removes_member() {
        let hub = InProcessHub::new();
        let alice = hub.join("standup", "alice").await.unwrap();
        let bob = hub.join("standup", "bob").await.unwrap();
        let mut alice_events = alice.subscribe_membership().await;

        bob.disconnect().await;

        assert_eq!(
            alice_events.recv().await,
            Some(MembershipEvent::Left("bob".to_string()))
        );
        assert!(alice.remote_participants().await.is_empty());
    }

    #[tokio::test]
    async fn publish_after_disconnect_fails() {
        let hub = InProcessHub::new();
        let alice = hub.join("standup", "alice").await.unwrap();
        alice.disconnect().await;
        let err = alice
            .publish_data(b"late".to_vec(), DeliveryKind::Reliable)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Publish(_)));
    }

    #[tokio::test]
    async fn duplicate_identity_is_rejected() {
        let hub = InProcessHub::new();
        let _alice = hub.join("standup", "alice").await.unwrap();
        assert!(hub.join("standup", "alice").await.is_err());
    }

    #[tokio::test]
    async fn dropped_receiver_is_pruned_on_next_publish() {
        let hub = InProcessHub::new();
        let alice = hub.join("standup", "alice").await.unwrap();
        let bob = hub.join("standup", "bob").await.unwrap();

        let bob_rx = bob.subscribe_data().await;
        drop(bob_rx);

        alice
            .publish_data(b"after drop".to_vec(), DeliveryKind::Reliable)
            .await
            .unwrap();

        let rooms = hub.rooms.lock().await;
        let slots = &rooms.get("standup").unwrap().members["bob"];
        assert!(slots.data.is_empty(), "closed slot should be pruned");
    }

    #[tokio::test]
    async fn remote_participants_are_sorted_and_exclude_self() {
        let hub = InProcessHub::new();
        let alice = hub.join("standup", "alice").await.unwrap();
        let _carol = hub.join("standup", "carol").await.unwrap();
        let _bob = hub.join("standup", "bob").await.unwrap();

        assert_eq!(alice.remote_participants().await, vec!["bob", "carol"]);
    }
}
