//! Access tokens: minting, verification, and the HTTP client shim.

mod client;
mod grants;
mod minter;

pub use client::TokenClient;
pub use grants::{AccessClaims, VideoGrants};
pub use minter::TokenMinter;
