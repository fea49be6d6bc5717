//! Data models for chat messages and rooms.

pub mod message;
pub mod room;

pub use message::*;
pub use room::*;
