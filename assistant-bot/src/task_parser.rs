//! Parses diary lines of the form `<task> | <YYYY-MM-DD HH:MM>`.
//!
//! The datetime is 24-hour wall-clock time in the given time zone. Times that do not exist
//! (or exist twice) in that zone are rejected instead of being guessed.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

pub const TASK_DELIMITER: char = '|';
pub const TASK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskParseError {
    #[error("expected '<task> | <YYYY-MM-DD HH:MM>', no '|' found")]
    MissingDelimiter,

    #[error("expected exactly one '|', found {0}")]
    TooManyDelimiters(usize),

    #[error("task text is empty")]
    EmptyTask,

    #[error("cannot read '{input}' as YYYY-MM-DD HH:MM: {reason}")]
    InvalidDateTime { input: String, reason: String },

    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(String),

    #[error("{0} is ambiguous in the local time zone")]
    AmbiguousLocalTime(String),
}

/// A successfully parsed diary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTask {
    pub task_text: String,
    /// Wall-clock time as typed.
    pub due_local: NaiveDateTime,
    pub due: DateTime<Utc>,
}

/// Parses using the machine's local time zone.
pub fn parse_task_line(line: &str) -> Result<ParsedTask, TaskParseError> {
    parse_task_line_in(line, &chrono::Local)
}

pub fn parse_task_line_in<Tz: TimeZone>(line: &str, tz: &Tz) -> Result<ParsedTask, TaskParseError> {
    let delimiters = line.matches(TASK_DELIMITER).count();
    let (task, time) = match delimiters {
        0 => return Err(TaskParseError::MissingDelimiter),
        1 => line
            .split_once(TASK_DELIMITER)
            .ok_or(TaskParseError::MissingDelimiter)?,
        n => return Err(TaskParseError::TooManyDelimiters(n)),
    };

    let task_text = task.trim();
    if task_text.is_empty() {
        return Err(TaskParseError::EmptyTask);
    }

    let time = time.trim();
    if !has_task_time_shape(time) {
        return Err(TaskParseError::InvalidDateTime {
            input: time.to_string(),
            reason: "expected four-digit year and two-digit fields".to_string(),
        });
    }
    let due_local = NaiveDateTime::parse_from_str(time, TASK_TIME_FORMAT).map_err(|e| {
        TaskParseError::InvalidDateTime {
            input: time.to_string(),
            reason: e.to_string(),
        }
    })?;

    let due = match tz.from_local_datetime(&due_local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(_, _) => {
            return Err(TaskParseError::AmbiguousLocalTime(time.to_string()))
        }
        LocalResult::None => return Err(TaskParseError::NonexistentLocalTime(time.to_string())),
    };

    Ok(ParsedTask {
        task_text: task_text.to_string(),
        due_local,
        due,
    })
}

/// `%Y` alone also takes signed and five-digit years; the diary format is exactly
/// `DDDD-DD-DD DD:DD`.
fn has_task_time_shape(time: &str) -> bool {
    const SHAPE: &[u8; 16] = b"DDDD-DD-DD DD:DD";
    let bytes = time.as_bytes();
    bytes.len() == SHAPE.len()
        && bytes.iter().zip(SHAPE).all(|(&b, &expected)| match expected {
            b'D' => b.is_ascii_digit(),
            sep => b == sep,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn plus_three() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    #[test]
    fn test_parse_valid_line_trims_whitespace() {
        let parsed = parse_task_line_in("  Buy milk  |  2030-01-01 10:00 ", &plus_three()).unwrap();
        assert_eq!(parsed.task_text, "Buy milk");
        assert_eq!(
            parsed.due_local,
            NaiveDate::from_ymd_opt(2030, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert_eq!(parsed.due.to_rfc3339(), "2030-01-01T07:00:00+00:00");
    }

    #[test]
    fn test_missing_delimiter() {
        assert_eq!(
            parse_task_line_in("Buy milk 2030-01-01 10:00", &Utc),
            Err(TaskParseError::MissingDelimiter)
        );
    }

    #[test]
    fn test_more_than_one_delimiter() {
        assert_eq!(
            parse_task_line_in("a | b | 2030-01-01 10:00", &Utc),
            Err(TaskParseError::TooManyDelimiters(2))
        );
    }

    #[test]
    fn test_empty_task_text() {
        assert_eq!(
            parse_task_line_in("   | 2030-01-01 10:00", &Utc),
            Err(TaskParseError::EmptyTask)
        );
    }

    #[test]
    fn test_invalid_datetime_surfaces_input() {
        let err = parse_task_line_in("Buy milk | tomorrow", &Utc).unwrap_err();
        assert!(matches!(err, TaskParseError::InvalidDateTime { ref input, .. } if input == "tomorrow"));
        assert!(err.to_string().contains("tomorrow"));

        assert!(parse_task_line_in("Buy milk | 2030-13-01 10:00", &Utc).is_err());
        assert!(parse_task_line_in("Buy milk | 2030-01-01 25:00", &Utc).is_err());
        assert!(parse_task_line_in("Buy milk | 2030-01-01", &Utc).is_err());
    }

    #[test]
    fn test_rejects_years_outside_four_digits() {
        for time in ["+10000-01-01 10:00", "-0001-01-01 10:00", "-262143-01-01 00:10", "10000-01-01 10:00"] {
            let err = parse_task_line_in(&format!("far | {}", time), &Utc).unwrap_err();
            assert!(
                matches!(err, TaskParseError::InvalidDateTime { ref input, .. } if input == time),
                "{} gave {:?}",
                time,
                err
            );
        }
    }

    #[test]
    fn test_rejects_short_fields() {
        assert!(parse_task_line_in("Buy milk | 2030-1-01 10:00", &Utc).is_err());
        assert!(parse_task_line_in("Buy milk | 2030-01-01 9:00", &Utc).is_err());
        assert!(parse_task_line_in("Buy milk | 2030-01-01T10:00", &Utc).is_err());
    }

    #[test]
    fn test_accepts_past_times() {
        let parsed = parse_task_line_in("Old | 2001-02-03 04:05", &Utc).unwrap();
        assert_eq!(parsed.due.to_rfc3339(), "2001-02-03T04:05:00+00:00");
    }
}
