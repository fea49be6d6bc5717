//! Access token issue and validation.

use crate::error::{AppError, AppResult};
use crate::token::grants::{AccessClaims, VideoGrants};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// Lifetime of a minted participant credential.
const TOKEN_TTL_HOURS: i64 = 6;

/// Mints signed access tokens granting join/publish/subscribe/publish-data
/// rights on a single room. The token contents are opaque to the rest of
/// the system; only the media provider inspects them.
#[derive(Clone)]
pub struct TokenMinter {
    api_key: String,
    api_secret: String,
}

impl TokenMinter {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }

    /// Issue a participant token for `identity` on `room`.
    pub fn mint(&self, room: &str, identity: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            iss: self.api_key.clone(),
            sub: identity.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            video: VideoGrants::participant(room),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )
        .map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok(token)
    }

    /// Validate a token and return its claims. Used for diagnostics and tests;
    /// the serving path never inspects tokens it minted.
    pub fn verify(&self, token: &str) -> AppResult<AccessClaims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.set_issuer(&[&self.api_key]);
        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.api_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok(data.claims)
    }
}
