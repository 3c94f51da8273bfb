//! Validation of raw text coming from the command line before it reaches
//! the gateway.

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
    tz::TimeZone,
};

use crate::{
    models::class_slot::{ClockTime, Weekday},
    services::ValidationError,
};

/// Parses progress text such as "75". Non-numeric and out of range input
/// is rejected rather than clamped.
pub fn parse_progress(raw: &str) -> Result<i64, ValidationError> {
    let value: i64 = raw
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| ValidationError::InvalidProgress(raw.to_string()))?;

    if !(0..=100).contains(&value) {
        return Err(ValidationError::InvalidProgress(raw.to_string()));
    }
    Ok(value)
}

/// Accepts an RFC 3339 instant, a civil date-time interpreted in `tz`, or a
/// bare date meaning the end of that day (23:59) in `tz`.
pub fn parse_due_date(raw: &str, tz: &TimeZone) -> Result<Timestamp, ValidationError> {
    let raw = raw.trim();
    let invalid = || ValidationError::InvalidDueDate(raw.to_string());

    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    let datetime = if raw.contains(['T', 't', ' ']) {
        raw.parse::<DateTime>().map_err(|_| invalid())?
    } else {
        let date: Date = raw.parse().map_err(|_| invalid())?;
        date.at(23, 59, 0, 0)
    };

    datetime
        .to_zoned(tz.clone())
        .map(|zoned| zoned.timestamp())
        .map_err(|_| invalid())
}

pub fn parse_weekday(raw: &str) -> Result<Weekday, ValidationError> {
    Ok(raw.parse()?)
}

pub fn parse_clock_time(raw: &str) -> Result<ClockTime, ValidationError> {
    Ok(raw.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_accepts_whole_numbers() {
        assert_eq!(parse_progress("0"), Ok(0));
        assert_eq!(parse_progress(" 75 "), Ok(75));
        assert_eq!(parse_progress("100%"), Ok(100));
    }

    #[test]
    fn test_parse_progress_rejects_bad_input() {
        assert!(matches!(
            parse_progress("abc"),
            Err(ValidationError::InvalidProgress(_))
        ));
        assert!(parse_progress("150").is_err());
        assert!(parse_progress("-5").is_err());
        assert!(parse_progress("12.5").is_err());
        assert!(parse_progress("").is_err());
    }

    #[test]
    fn test_parse_due_date_forms() {
        let utc = TimeZone::UTC;

        let instant = parse_due_date("2026-03-05T17:00:00Z", &utc).unwrap();
        assert_eq!(instant.to_string(), "2026-03-05T17:00:00Z");

        let civil = parse_due_date("2026-03-05T09:30", &utc).unwrap();
        assert_eq!(civil.to_string(), "2026-03-05T09:30:00Z");

        let date_only = parse_due_date("2026-03-05", &utc).unwrap();
        assert_eq!(date_only.to_string(), "2026-03-05T23:59:00Z");
    }

    #[test]
    fn test_parse_due_date_rejects_garbage() {
        assert!(matches!(
            parse_due_date("next tuesday", &TimeZone::UTC),
            Err(ValidationError::InvalidDueDate(_))
        ));
        assert!(parse_due_date("2026-13-40", &TimeZone::UTC).is_err());
    }

    #[test]
    fn test_parse_weekday_and_time_wrap_model_errors() {
        assert_eq!(parse_weekday("tue"), Ok(Weekday::Tuesday));
        assert!(matches!(
            parse_weekday("Caturday"),
            Err(ValidationError::InvalidWeekday(_))
        ));
        assert!(matches!(
            parse_clock_time("25:00"),
            Err(ValidationError::InvalidClockTime(_))
        ));
    }
}
