//! Validation constants and utilities
//!
//! Shared input checks for the admin write paths.

/// Maximum length for an event name
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for city and venue fields
pub const MAX_PLACE_LENGTH: usize = 200;

/// Maximum length for the short description shown on cards
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Maximum length for image and sales URLs
pub const MAX_URL_LENGTH: usize = 2048;

/// Validate string length (in characters)
pub fn validate_length(field_name: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.chars().count() > max_len {
        Err(format!("{} too long (max {})", field_name, max_len))
    } else {
        Ok(())
    }
}

/// Validate that a required string is not blank
pub fn validate_not_blank(field_name: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a string contains no control characters (except tab)
///
/// For single-line fields (name, city, venue, URLs).
pub fn validate_no_control_chars(field_name: &str, value: &str) -> Result<(), String> {
    if value.chars().any(|c| c.is_control() && c != '\t') {
        Err(format!("{} cannot contain control characters", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a string contains no dangerous control characters
///
/// Allows newline, carriage return and tab. Used for the description.
pub fn validate_safe_multiline_text(field_name: &str, value: &str) -> Result<(), String> {
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        Err(format!("{} cannot contain control characters", field_name))
    } else {
        Ok(())
    }
}

/// Validate a local time-of-day string in `HH:MM` form
pub fn validate_time_of_day(field_name: &str, value: &str) -> Result<(), String> {
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| format!("{} must be in HH:MM format", field_name))
}
