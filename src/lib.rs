//! Video-meeting chat backend built with Rust.
//!
//! Provides the access token service for a hosted media provider plus the
//! client-side chat slice: a typed chat channel over the room's reliable
//! data-publish primitive and a participant roster tracker.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;
pub mod token;
pub mod transport;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::http::AppState;
pub use services::chat::ChatChannel;
pub use services::roster::MembershipTracker;
pub use session::RoomSession;
pub use token::{TokenClient, TokenMinter};

use axum::routing::{get, post};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router (token, rooms, health). Used by main and by
/// integration tests. CORS is permissive: the browser front end calls these
/// endpoints cross-origin.
pub fn create_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/api/token", post(handlers::participant_token))
        .route("/api/rooms", get(handlers::room_lookup))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
