//! Chat over the room's data-publish primitive: typed send/receive plus the
//! ordered message log for display.

use crate::error::{AppError, AppResult};
use crate::models::message::{
    ChatMessage, ChatPayload, MessageKind, MessageSender, PLACEHOLDER_AVATAR, UNKNOWN_SENDER,
};
use crate::session::RoomSession;
use crate::transport::DeliveryKind;
use chrono::{TimeZone, Utc};
use tracing::debug;

/// Turns the session's generic binary publish/receive into a typed chat
/// stream. Holds the display log; inbound messages are appended in arrival
/// order, which for a single sender equals the transport's reliable
/// delivery order. Interleaving across senders is arrival order, nothing
/// stronger.
#[derive(Debug)]
pub struct ChatChannel {
    local_identity: String,
    log: Vec<ChatMessage>,
    /// Last clock value used for an id, to keep ids strictly increasing even
    /// when two sends land in the same millisecond.
    last_issued_ms: i64,
}

impl ChatChannel {
    pub fn new(local_identity: impl Into<String>) -> Self {
        Self {
            local_identity: local_identity.into(),
            log: Vec::new(),
            last_issued_ms: 0,
        }
    }

    pub fn local_identity(&self) -> &str {
        &self.local_identity
    }

    /// Publish `content` to the room, reliable delivery, and return the
    /// composed message for optimistic local echo. The message is NOT
    /// appended to the log here; the caller appends it via [`record`]
    /// once it decides to display it.
    ///
    /// Fails with `Validation` on empty (post-trim) content and `Publish`
    /// when the session cannot deliver. No retry either way.
    ///
    /// [`record`]: ChatChannel::record
    pub async fn send(&mut self, session: &RoomSession, content: &str) -> AppResult<ChatMessage> {
        let (message, bytes) = self.compose(content, Utc::now().timestamp_millis())?;
        session.publish_data(bytes, DeliveryKind::Reliable).await?;
        debug!(id = %message.id, identity = %self.local_identity, "chat message published");
        Ok(message)
    }

    /// Build the outbound message and wire bytes for a send at `now_ms`.
    /// Content is carried verbatim; trimming only gates the emptiness check.
    fn compose(&mut self, content: &str, now_ms: i64) -> AppResult<(ChatMessage, Vec<u8>)> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("message content is empty".to_string()));
        }

        let ms = if now_ms <= self.last_issued_ms {
            self.last_issued_ms + 1
        } else {
            now_ms
        };
        self.last_issued_ms = ms;

        let timestamp = Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("clock reading out of range")))?;
        let payload = ChatPayload {
            id: ms.to_string(),
            content: content.to_string(),
            timestamp: timestamp.to_rfc3339(),
        };
        let bytes = payload.encode()?;
        let message = ChatMessage {
            id: payload.id,
            content: payload.content,
            sender: MessageSender {
                name: self.local_identity.clone(),
                avatar: None,
            },
            timestamp,
            kind: MessageKind::User,
        };
        Ok((message, bytes))
    }

    /// Append a message to the display log. Used by the caller for the
    /// optimistic echo of a message returned from [`send`].
    ///
    /// [`send`]: ChatChannel::send
    pub fn record(&mut self, message: ChatMessage) {
        self.log.push(message);
    }

    /// Handle an inbound data payload. On success the reconstructed message
    /// keeps the sender's declared id and timestamp verbatim, is appended to
    /// the log, and returned. On any decode failure the log is untouched and
    /// the error is `MalformedPayload`; the session stays usable.
    pub fn on_receive(&mut self, payload: &[u8], origin: Option<&str>) -> AppResult<ChatMessage> {
        let (payload, timestamp) = ChatPayload::decode(payload)?;
        let message = ChatMessage {
            id: payload.id,
            content: payload.content,
            sender: MessageSender {
                name: origin.unwrap_or(UNKNOWN_SENDER).to_string(),
                avatar: Some(PLACEHOLDER_AVATAR.to_string()),
            },
            timestamp,
            kind: MessageKind::User,
        };
        self.log.push(message.clone());
        Ok(message)
    }

    /// Append a locally synthesized notice (e.g. "bob joined"). Never
    /// serialized to the wire.
    pub fn system_notice(&mut self, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::system(content, Utc::now());
        self.log.push(message.clone());
        message
    }

    /// The display log, in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.log
    }
}
