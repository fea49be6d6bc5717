//! Room naming and meeting code generation.

use crate::error::{AppError, AppResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

const MAX_ROOM_NAME_LEN: usize = 128;

const ADJECTIVES: [&str; 5] = ["happy", "swift", "clever", "bright", "calm"];
const NOUNS: [&str; 5] = ["tiger", "eagle", "dolphin", "falcon", "wolf"];

/// Opaque room descriptor returned by the lookup endpoint. Enough for a
/// client to subsequently request a participant credential for the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDescriptor {
    pub room: String,
}

/// Validate a client-supplied room name: non-empty after trim, bounded
/// length, conservative charset.
pub fn validate_room_name(name: &str) -> AppResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidRoom("room name is empty".to_string()));
    }
    if name.len() > MAX_ROOM_NAME_LEN {
        return Err(AppError::InvalidRoom(format!(
            "room name longer than {} chars",
            MAX_ROOM_NAME_LEN
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::InvalidRoom(format!(
            "room name has invalid characters: {}",
            name
        )));
    }
    Ok(())
}

/// Generate a readable meeting code, e.g. `swift-falcon-042`.
pub fn generate_meeting_code() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let number: u16 = rng.gen_range(0..1000);
    format!("{}-{}-{:03}", adjective, noun, number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_room_names() {
        assert!(validate_room_name("standup").is_ok());
        assert!(validate_room_name("swift-falcon-042").is_ok());
        assert!(validate_room_name("room_1").is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(validate_room_name("").is_err());
        assert!(validate_room_name("   ").is_err());
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(validate_room_name("room with spaces").is_err());
        assert!(validate_room_name("room/1").is_err());
    }

    #[test]
    fn rejects_overlong_names() {
        let long = "a".repeat(MAX_ROOM_NAME_LEN + 1);
        assert!(validate_room_name(&long).is_err());
    }

    #[test]
    fn generated_codes_validate() {
        for _ in 0..32 {
            let code = generate_meeting_code();
            assert!(validate_room_name(&code).is_ok(), "bad code: {}", code);
            let parts: Vec<&str> = code.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[2].len(), 3);
        }
    }
}
