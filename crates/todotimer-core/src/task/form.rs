//! Field validation shared by the task list and the input surfaces.
//!
//! Front ends run these before calling into the core so they can show a
//! field-level message; the task list runs them again on every write.

use crate::error::ValidationError;

/// Return the trimmed name, or `EmptyName`.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

pub fn validate_duration(duration: u32) -> Result<u32, ValidationError> {
    if duration == 0 {
        return Err(ValidationError::NonPositiveDuration(0));
    }
    Ok(duration)
}

/// Parse a duration form field (whole minutes, positive).
pub fn parse_duration(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidDuration(trimmed.to_string()))?;
    if value <= 0 {
        return Err(ValidationError::NonPositiveDuration(value));
    }
    u32::try_from(value).map_err(|_| ValidationError::InvalidDuration(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(validate_name("  Read  ").unwrap(), "Read");
    }

    #[test]
    fn blank_name_rejected() {
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
        assert_eq!(validate_name(""), Err(ValidationError::EmptyName));
    }

    #[test]
    fn zero_duration_rejected() {
        assert_eq!(
            validate_duration(0),
            Err(ValidationError::NonPositiveDuration(0))
        );
        assert_eq!(validate_duration(1), Ok(1));
    }

    #[test]
    fn parse_duration_accepts_positive_integers() {
        assert_eq!(parse_duration("25"), Ok(25));
        assert_eq!(parse_duration(" 7 "), Ok(7));
    }

    #[test]
    fn parse_duration_rejects_bad_input() {
        assert_eq!(
            parse_duration("-3"),
            Err(ValidationError::NonPositiveDuration(-3))
        );
        assert_eq!(
            parse_duration("0"),
            Err(ValidationError::NonPositiveDuration(0))
        );
        assert_eq!(
            parse_duration("2.5"),
            Err(ValidationError::InvalidDuration("2.5".into()))
        );
        assert_eq!(
            parse_duration("ten"),
            Err(ValidationError::InvalidDuration("ten".into()))
        );
        assert!(matches!(
            parse_duration("99999999999"),
            Err(ValidationError::InvalidDuration(_))
        ));
    }
}
