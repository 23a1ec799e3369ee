//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_LEN: usize = 32;

/// Validates a player name: non-blank, at most [`MAX_PLAYER_NAME_LEN`]
/// characters, no control characters and no surrounding whitespace.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Alice")   // Ok
/// validate_player_name("  ")      // Err - blank
/// validate_player_name(" Alice")  // Err - surrounding whitespace
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("Player name must not be blank".into());
        return Err(err);
    }

    let length = name.chars().count();
    if length > MAX_PLAYER_NAME_LEN {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be at most {MAX_PLAYER_NAME_LEN} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    if name.trim() != name {
        let mut err = ValidationError::new("player_name_whitespace");
        err.message = Some("Player name must not start or end with whitespace".into());
        return Err(err);
    }

    if name.chars().any(char::is_control) {
        let mut err = ValidationError::new("player_name_format");
        err.message = Some("Player name must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("alice").is_ok());
        assert!(validate_player_name("Team Rocket").is_ok());
        assert!(validate_player_name("Zoë").is_ok());
        assert!(validate_player_name(&"x".repeat(MAX_PLAYER_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_validate_player_name_blank() {
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("   ").is_err());
    }

    #[test]
    fn test_validate_player_name_invalid_format() {
        assert!(validate_player_name(" alice").is_err()); // leading space
        assert!(validate_player_name("alice\n").is_err()); // trailing newline
        assert!(validate_player_name("al\tice").is_err()); // tab
        assert!(validate_player_name(&"x".repeat(MAX_PLAYER_NAME_LEN + 1)).is_err());
    }
}
