use chrono::NaiveDate;

use super::{DomainError, Period};

/// The date/mode fields of a create or update payload, after merging with
/// any existing record. Only presence matters for `attachment`.
#[derive(Debug, Clone)]
pub struct LeaveInput {
    pub date_from: NaiveDate,
    pub date_to: Option<NaiveDate>,
    pub half_day: bool,
    pub period: Option<Period>,
    pub has_attachment: bool,
}

/// Validates a leave request before it reaches the workflow or calculator.
///
/// `earliest_start` is today for new requests and the record's creation
/// date for edits. `requires_document` comes from the referenced leave
/// type's `support_document` flag.
pub fn validate(
    input: &LeaveInput,
    earliest_start: NaiveDate,
    requires_document: bool,
) -> Result<(), DomainError> {
    if input.half_day {
        // date_to is not collected for half-day requests
        if input.period.is_none() {
            return Err(DomainError::MissingRequiredField("period"));
        }
    } else {
        let date_to = input
            .date_to
            .ok_or(DomainError::MissingRequiredField("date_to"))?;

        if date_to < input.date_from {
            return Err(DomainError::InvalidRange);
        }
    }

    if input.date_from < earliest_start {
        return Err(DomainError::BackDated(earliest_start));
    }

    if requires_document && !input.has_attachment {
        return Err(DomainError::MissingRequiredField("attachment"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_day() -> LeaveInput {
        LeaveInput {
            date_from: date(2024, 6, 3),
            date_to: Some(date(2024, 6, 7)),
            half_day: false,
            period: None,
            has_attachment: false,
        }
    }

    #[test]
    fn test_valid_full_day_passes() {
        assert!(validate(&full_day(), date(2024, 6, 1), false).is_ok());
    }

    #[test]
    fn test_full_day_requires_date_to() {
        let input = LeaveInput {
            date_to: None,
            ..full_day()
        };

        let err = validate(&input, date(2024, 6, 1), false).unwrap_err();
        assert_eq!(err, DomainError::MissingRequiredField("date_to"));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let input = LeaveInput {
            date_to: Some(date(2024, 6, 1)),
            ..full_day()
        };

        let err = validate(&input, date(2024, 6, 1), false).unwrap_err();
        assert_eq!(err, DomainError::InvalidRange);
    }

    #[test]
    fn test_half_day_requires_period() {
        let input = LeaveInput {
            half_day: true,
            period: None,
            ..full_day()
        };

        let err = validate(&input, date(2024, 6, 1), false).unwrap_err();
        assert_eq!(err, DomainError::MissingRequiredField("period"));
    }

    #[test]
    fn test_half_day_with_period_passes_without_date_to() {
        let input = LeaveInput {
            half_day: true,
            period: Some(Period::Morning),
            date_to: None,
            ..full_day()
        };

        assert!(validate(&input, date(2024, 6, 1), false).is_ok());
    }

    #[test]
    fn test_half_day_ignores_reversed_date_to() {
        let input = LeaveInput {
            half_day: true,
            period: Some(Period::Afternoon),
            date_to: Some(date(2024, 1, 1)),
            ..full_day()
        };

        assert!(validate(&input, date(2024, 6, 1), false).is_ok());
    }

    #[test]
    fn test_back_dated_request_is_rejected() {
        let today = date(2024, 6, 10);
        let err = validate(&full_day(), today, false).unwrap_err();
        assert_eq!(err, DomainError::BackDated(today));
    }

    #[test]
    fn test_start_on_earliest_day_is_allowed() {
        assert!(validate(&full_day(), date(2024, 6, 3), false).is_ok());
    }

    #[test]
    fn test_documenting_leave_type_requires_attachment() {
        let err = validate(&full_day(), date(2024, 6, 1), true).unwrap_err();
        assert_eq!(err, DomainError::MissingRequiredField("attachment"));

        let input = LeaveInput {
            has_attachment: true,
            ..full_day()
        };
        assert!(validate(&input, date(2024, 6, 1), true).is_ok());
    }
}
