//! HTTP shim for the token service, used by the client half of the system.

use crate::error::{AppError, AppResult};
use crate::models::room::RoomDescriptor;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    token: String,
}

/// Thin client for the credential and room-lookup endpoints. Every failure,
/// transport, non-2xx status, or an unreadable body, surfaces as
/// [`AppError::Credential`]: from the caller's side the session simply
/// never opens.
#[derive(Clone)]
pub struct TokenClient {
    base_url: String,
    http: reqwest::Client,
}

impl TokenClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Request a participant credential for `identity` on `room`.
    pub async fn participant_token(&self, room: &str, identity: &str) -> AppResult<String> {
        let url = format!("{}/api/token", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "roomName": room, "participantName": identity }))
            .send()
            .await
            .map_err(|e| AppError::Credential(format!("token service unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Credential(format!("token service refused: {}", e)))?;
        let envelope: TokenEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::Credential(format!("bad token response: {}", e)))?;
        debug!(room = %room, identity = %identity, "participant token fetched");
        Ok(envelope.token)
    }

    /// Look up (or create) a room by name; omitting the name asks the service
    /// to generate a meeting code.
    pub async fn lookup_room(&self, room: Option<&str>) -> AppResult<RoomDescriptor> {
        let url = format!("{}/api/rooms", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(room) = room {
            request = request.query(&[("room", room)]);
        }
        let descriptor = request
            .send()
            .await
            .map_err(|e| AppError::Credential(format!("token service unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Credential(format!("room lookup refused: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Credential(format!("bad room response: {}", e)))?;
        Ok(descriptor)
    }
}
