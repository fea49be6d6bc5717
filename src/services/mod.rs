//! Business logic: chat over the data channel and roster tracking.

pub mod chat;
pub mod roster;

pub use chat::ChatChannel;
pub use roster::MembershipTracker;
