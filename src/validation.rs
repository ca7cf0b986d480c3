//! Input validation for user-supplied names that end up on disk.

/// Longest accepted save label, in characters.
pub const MAX_LABEL_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("label is empty")]
    Empty,

    #[error("label is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("label contains control characters")]
    ControlCharacters,
}

/// Generate a filesystem-safe file name fragment using percent encoding.
pub fn safe_filename(label: &str) -> String {
    use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
    utf8_percent_encode(label, NON_ALPHANUMERIC).to_string()
}

/// Validate a save label and return it trimmed.
pub fn validate_save_label(label: &str) -> Result<String, ValidationError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.chars().count() > MAX_LABEL_CHARS {
        return Err(ValidationError::TooLong {
            max: MAX_LABEL_CHARS,
        });
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacters);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("anonymous"), "anonymous");
        assert_eq!(safe_filename("slot 1"), "slot%201");
        assert!(!safe_filename("../etc/passwd").contains('/'));
        assert!(!safe_filename("a\\b").contains('\\'));
    }

    #[test]
    fn test_save_label_validation() {
        assert_eq!(validate_save_label("  slot 1 ").unwrap(), "slot 1");
        assert_eq!(validate_save_label("   "), Err(ValidationError::Empty));
        assert_eq!(
            validate_save_label(&"x".repeat(MAX_LABEL_CHARS + 1)),
            Err(ValidationError::TooLong {
                max: MAX_LABEL_CHARS
            })
        );
        assert_eq!(
            validate_save_label("bad\u{7}bell"),
            Err(ValidationError::ControlCharacters)
        );
        assert!(validate_save_label("周末存档").is_ok());
    }
}
