//! Chat message model and the data-channel wire envelope.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Avatar used for inbound messages; the transport carries no avatar data.
pub const PLACEHOLDER_AVATAR: &str = "/placeholder.svg";

/// Identity shown next to a payload whose origin the transport did not supply.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Who sent a message, as displayed. `name` is the room-session participant
/// identity; it is not authenticated beyond what the access token encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Message origin class. `System` entries are synthesized locally
/// (join/leave notices) and are never serialized to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    User,
    System,
}

/// A chat message as held in the display log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender-assigned id, unique within that sender's stream.
    pub id: String,
    pub content: String,
    pub sender: MessageSender,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Build a locally synthesized notice (join/leave etc.).
    pub fn system(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("system-{}", timestamp.timestamp_millis()),
            content: content.into(),
            sender: MessageSender {
                name: "system".to_string(),
                avatar: None,
            },
            timestamp,
            kind: MessageKind::System,
        }
    }
}

/// The wire envelope: UTF-8 JSON with exactly these fields. There is no
/// version field and no kind discriminator; everything on the wire is a
/// user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatPayload {
    pub id: String,
    pub content: String,
    /// RFC 3339 on encode; decode also accepts a numeric epoch-milliseconds
    /// string for senders keyed on a raw clock reading.
    pub timestamp: String,
}

impl ChatPayload {
    /// Serialize for publishing over the data channel.
    pub fn encode(&self) -> AppResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse an inbound payload. Any decode failure, UTF-8, JSON shape, or
    /// timestamp conversion, is a [`AppError::MalformedPayload`]; the caller
    /// drops the payload and the session stays usable.
    pub fn decode(raw: &[u8]) -> AppResult<(Self, DateTime<Utc>)> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| AppError::MalformedPayload(format!("not UTF-8: {}", e)))?;
        let payload: ChatPayload = serde_json::from_str(text)
            .map_err(|e| AppError::MalformedPayload(format!("not a chat envelope: {}", e)))?;
        let timestamp = parse_timestamp(&payload.timestamp).ok_or_else(|| {
            AppError::MalformedPayload(format!("bad timestamp: {:?}", payload.timestamp))
        })?;
        Ok((payload, timestamp))
    }
}

/// Accepts RFC 3339 or a numeric epoch-milliseconds string.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let millis: i64 = raw.parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}
