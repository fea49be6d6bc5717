//! HTTP handlers: participant credential, room lookup, and health.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::config::Config;
use crate::error::AppError;
use crate::models::room::{generate_meeting_code, validate_room_name, RoomDescriptor};
use crate::token::TokenMinter;

/// Shared application state for the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    /// `None` when signing credentials are unconfigured; the credential
    /// endpoint then fails with [`AppError::Credential`].
    token_minter: Option<TokenMinter>,
}

impl AppState {
    pub fn new(token_minter: Option<TokenMinter>) -> Self {
        Self { token_minter }
    }

    pub fn from_config(config: &Config) -> Self {
        let token_minter = match (&config.api_key, &config.api_secret) {
            (Some(key), Some(secret)) => Some(TokenMinter::new(key.clone(), secret.clone())),
            _ => None,
        };
        Self { token_minter }
    }

    pub fn token_minter(&self) -> Option<&TokenMinter> {
        self.token_minter.as_ref()
    }
}

/// Credential request: which room, and who is joining.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[validate(length(min = 1, max = 128))]
    pub room_name: String,
    #[validate(length(min = 1, max = 128))]
    pub participant_name: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/token — mint a participant credential granting
/// join/publish/subscribe/publish-data on the requested room.
pub async fn participant_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    validate_room_name(&body.room_name)?;
    let identity = body.participant_name.trim();
    if identity.is_empty() {
        return Err(AppError::Validation(
            "participantName is empty".to_string(),
        ));
    }

    let minter = state.token_minter().ok_or_else(|| {
        AppError::Credential("signing credentials are not configured".to_string())
    })?;
    let token = minter.mint(body.room_name.trim(), identity)?;
    info!(room = %body.room_name, identity = %identity, "participant token minted");
    Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    pub room: Option<String>,
}

/// GET /api/rooms?room=<name> — look up a room by name, or generate a fresh
/// meeting code when no name is given. The descriptor is opaque to the
/// client; it only feeds the subsequent credential request.
pub async fn room_lookup(
    Query(params): Query<RoomQuery>,
) -> Result<Json<RoomDescriptor>, AppError> {
    let room = match params.room {
        Some(name) => {
            validate_room_name(&name)?;
            name.trim().to_string()
        }
        None => {
            let code = generate_meeting_code();
            info!(room = %code, "meeting code generated");
            code
        }
    };
    Ok(Json(RoomDescriptor { room }))
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "meetkit" })),
    )
}
