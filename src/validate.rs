use thiserror::Error;

use crate::model::TaskInput;

/// Input rejected before any write reached the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: String, end: String },
    #[error("invalid {field} '{value}'")]
    UnknownLabel { field: &'static str, value: String },
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    BadDate(String),
    #[error("task {0} is already complete")]
    AlreadyComplete(i64),
}

/// Validate a task before insert or update: title must be non-blank and
/// the end date must not precede the start date.
pub fn validate_input(input: &TaskInput) -> Result<(), ValidationError> {
    if input.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if input.end_date < input.start_date {
        return Err(ValidationError::EndBeforeStart {
            start: input.start_date.to_string(),
            end: input.end_date.to_string(),
        });
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date typed by a user.
pub fn parse_date(s: &str) -> Result<chrono::NaiveDate, ValidationError> {
    chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::BadDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn valid_input() {
        let input = TaskInput::new("write report", day(1));
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn blank_titles_rejected() {
        assert_eq!(
            validate_input(&TaskInput::new("", day(1))),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            validate_input(&TaskInput::new("   ", day(1))),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn end_before_start_rejected() {
        let mut input = TaskInput::new("t", day(10));
        input.end_date = day(9);
        assert!(matches!(
            validate_input(&input),
            Err(ValidationError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn same_day_span_allowed() {
        let mut input = TaskInput::new("t", day(10));
        input.end_date = day(10);
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn parse_dates() {
        assert_eq!(parse_date("2024-05-03").unwrap(), day(3));
        assert_eq!(parse_date(" 2024-05-03 ").unwrap(), day(3));
        assert!(parse_date("05/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
