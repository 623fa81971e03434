//! Validation helpers for DTOs.

use validator::ValidationError;

/// Maximum accepted nickname length in characters.
const NICKNAME_MAX_CHARS: usize = 24;

/// Validates that a nickname is non-blank and at most 24 characters.
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if nickname.trim().is_empty() {
        let mut err = ValidationError::new("nickname_blank");
        err.message = Some("Nickname must not be blank".into());
        return Err(err);
    }

    if nickname.chars().count() > NICKNAME_MAX_CHARS {
        let mut err = ValidationError::new("nickname_length");
        err.message = Some(
            format!(
                "Nickname must be at most {NICKNAME_MAX_CHARS} characters (got {})",
                nickname.chars().count()
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_nickname_valid() {
        assert!(validate_nickname("X").is_ok());
        assert!(validate_nickname("player one").is_ok());
        assert!(validate_nickname(&"a".repeat(24)).is_ok());
    }

    #[test]
    fn test_validate_nickname_blank() {
        assert!(validate_nickname("").is_err());
        assert!(validate_nickname("   ").is_err());
    }

    #[test]
    fn test_validate_nickname_too_long() {
        assert!(validate_nickname(&"a".repeat(25)).is_err());
    }
}
