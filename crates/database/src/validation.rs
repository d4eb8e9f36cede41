//! Input validation for user-facing writes.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Phone number is not exactly eleven ASCII digits.
    InvalidPhoneNumber(String),
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidPhoneNumber(_) => write!(
                f,
                "Invalid phone number. Use {} digits (e.g. 08012345678).",
                PHONE_NUMBER_LENGTH
            ),
            ValidationError::Empty(field) => write!(f, "{} is required", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Length of a stored phone number.
pub const PHONE_NUMBER_LENGTH: usize = 11;

/// Check that a phone number is exactly eleven ASCII digits.
///
/// The caller is expected to have trimmed surrounding whitespace.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let valid = phone.len() == PHONE_NUMBER_LENGTH && phone.bytes().all(|b| b.is_ascii_digit());

    if !valid {
        return Err(ValidationError::InvalidPhoneNumber(phone.to_string()));
    }

    Ok(())
}

/// Check that a display name is present.
pub fn validate_full_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty("Full name".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_number_valid() {
        assert!(validate_phone_number("08012345678").is_ok());
        assert!(validate_phone_number("00000000000").is_ok());
    }

    #[test]
    fn test_validate_phone_number_invalid() {
        // Ten digits
        assert!(matches!(
            validate_phone_number("0801234567"),
            Err(ValidationError::InvalidPhoneNumber(_))
        ));

        // Twelve digits
        assert!(validate_phone_number("080123456789").is_err());

        // Letters and symbols
        assert!(validate_phone_number("0801234567a").is_err());
        assert!(validate_phone_number("+2348012345").is_err());

        // Non-ASCII digits
        assert!(validate_phone_number("٠٨٠١٢٣٤٥٦٧٨").is_err());

        // Empty
        assert!(validate_phone_number("").is_err());
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("Ada Obi").is_ok());
        assert_eq!(
            validate_full_name("   "),
            Err(ValidationError::Empty("Full name".to_string()))
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidPhoneNumber("123".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid phone number. Use 11 digits (e.g. 08012345678)."
        );

        let err = ValidationError::Empty("Full name".to_string());
        assert_eq!(err.to_string(), "Full name is required");
    }
}
