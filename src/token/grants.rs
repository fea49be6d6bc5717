//! Claim shapes for room access tokens.

use serde::{Deserialize, Serialize};

/// Per-room rights granted to a participant. Field names follow the media
/// provider's camelCase claim convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrants {
    pub room: String,
    pub room_join: bool,
    pub can_publish: bool,
    pub can_subscribe: bool,
    pub can_publish_data: bool,
}

impl VideoGrants {
    /// Full participant rights on one room: join, publish media, subscribe,
    /// and publish data-channel payloads.
    pub fn participant(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            room_join: true,
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
        }
    }
}

/// JWT claims carried by a minted access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// API key that signed the token.
    pub iss: String,
    /// Participant identity.
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub video: VideoGrants,
}
