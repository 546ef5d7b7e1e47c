//! Input validation for delivery slot commands.

use std::fmt;

use chrono::NaiveTime;

/// Time value that disables delivery for a weekday.
pub const DISABLE_SLOT_SENTINEL: &str = "25:00";

/// Weekday abbreviations, Monday = 0.
pub const WEEKDAY_NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Not one of `mon`..`sun`.
    UnknownWeekday(String),
    /// Not a valid `HH:MM` time.
    InvalidTime(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownWeekday(value) => {
                write!(f, "Unknown weekday '{}', expected one of mon, tue, wed, thu, fri, sat, sun", value)
            }
            ValidationError::InvalidTime(value) => {
                write!(f, "Invalid time '{}', expected HH:MM", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// What a `/time` command asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSetting {
    /// Deliver at this zero-padded `HH:MM`.
    At(String),
    /// Remove the weekday's slot.
    Disabled,
}

/// Parse a weekday abbreviation (`mon`..`sun`, case-insensitive) into 0..=6.
pub fn parse_weekday(value: &str) -> Result<u8, ValidationError> {
    let lowered = value.trim().to_lowercase();
    WEEKDAY_NAMES
        .iter()
        .position(|name| *name == lowered)
        .map(|index| index as u8)
        .ok_or_else(|| ValidationError::UnknownWeekday(value.trim().to_string()))
}

/// Abbreviation for a weekday index, if in range.
pub fn weekday_name(weekday: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(weekday as usize).copied()
}

/// Parse `HH:MM` and normalize it to the zero-padded form the scheduler matches on.
pub fn parse_time_of_day(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    let valid_shape = value.len() <= 5
        && value
            .split_once(':')
            .map(|(h, m)| !h.is_empty() && h.len() <= 2 && m.len() == 2)
            .unwrap_or(false);

    if !valid_shape {
        return Err(ValidationError::InvalidTime(value.to_string()));
    }

    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

/// Parse the time argument of a slot command, honoring the disable sentinel.
pub fn parse_slot_setting(value: &str) -> Result<SlotSetting, ValidationError> {
    if value.trim() == DISABLE_SLOT_SENTINEL {
        return Ok(SlotSetting::Disabled);
    }
    parse_time_of_day(value).map(SlotSetting::At)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("mon"), Ok(0));
        assert_eq!(parse_weekday("fri"), Ok(4));
        assert_eq!(parse_weekday("SUN"), Ok(6));
        assert!(matches!(
            parse_weekday("friday"),
            Err(ValidationError::UnknownWeekday(_))
        ));
        assert!(parse_weekday("").is_err());
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(0), Some("mon"));
        assert_eq!(weekday_name(6), Some("sun"));
        assert_eq!(weekday_name(7), None);
    }

    #[test]
    fn test_parse_time_of_day_valid() {
        assert_eq!(parse_time_of_day("09:00"), Ok("09:00".to_string()));
        assert_eq!(parse_time_of_day("9:05"), Ok("09:05".to_string()));
        assert_eq!(parse_time_of_day("23:59"), Ok("23:59".to_string()));
        assert_eq!(parse_time_of_day(" 16:00 "), Ok("16:00".to_string()));
    }

    #[test]
    fn test_parse_time_of_day_invalid() {
        for value in ["24:00", "12:60", "1200", "12:5", "noon", "", "12:00:00", "25:00"] {
            assert!(
                matches!(parse_time_of_day(value), Err(ValidationError::InvalidTime(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_slot_setting() {
        assert_eq!(parse_slot_setting("25:00"), Ok(SlotSetting::Disabled));
        assert_eq!(
            parse_slot_setting("07:30"),
            Ok(SlotSetting::At("07:30".to_string()))
        );
        assert!(parse_slot_setting("26:00").is_err());
    }
}
