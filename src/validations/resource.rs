use validator::ValidationError;

/// Longest short name accepted from callers or configuration
pub const MAX_SHORT_NAME_LENGTH: usize = 10;

/// Validates that a caller-supplied short name:
/// - Is between 1 and 10 characters
/// - Only contains upper-case ASCII letters and digits
pub fn validate_short_name(short_name: &str) -> Result<(), ValidationError> {
    if short_name.is_empty() || short_name.len() > MAX_SHORT_NAME_LENGTH {
        let mut err = ValidationError::new("short_name_length");
        err.message = Some("Short name must be between 1 and 10 characters".into());
        return Err(err);
    }

    if !short_name
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        let mut err = ValidationError::new("short_name_charset");
        err.message =
            Some("Short name can only contain upper-case letters and digits".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_short_name() {
        // Valid short names
        assert!(validate_short_name("D").is_ok());
        assert!(validate_short_name("DW2").is_ok());
        assert!(validate_short_name("ABCDEFGHIJ").is_ok());

        // Invalid short names
        assert!(validate_short_name("").is_err());
        assert!(validate_short_name("ABCDEFGHIJK").is_err());
        assert!(validate_short_name("dw").is_err());
        assert!(validate_short_name("D-W").is_err());
    }
}
