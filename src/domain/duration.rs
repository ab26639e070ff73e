use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::DomainError;

/// Number of business days (Mon-Fri) between `from` and `to` inclusive.
/// An all-weekend range counts 0.
pub fn business_days(from: NaiveDate, to: NaiveDate) -> u32 {
    let mut days = 0;
    let mut current = from;

    while current <= to {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days += 1;
        }
        current += Duration::days(1);
    }

    days
}

/// Chargeable units for a leave request, derived on every read.
///
/// Half-day requests are fixed at 0.5 and ignore `date_to` entirely.
/// Full-day requests count business days over the inclusive range; a
/// missing `date_to` falls back to a single-day range.
pub fn requested_days(
    date_from: NaiveDate,
    date_to: Option<NaiveDate>,
    half_day: bool,
) -> Result<f64, DomainError> {
    if half_day {
        return Ok(0.5);
    }

    let date_to = date_to.unwrap_or(date_from);
    if date_to < date_from {
        return Err(DomainError::InvalidRange);
    }

    Ok(f64::from(business_days(date_from, date_to)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_week_counts_weekdays_only() {
        // Mon 2024-06-03 through Sun 2024-06-09
        let days = requested_days(date(2024, 6, 3), Some(date(2024, 6, 9)), false).unwrap();
        assert_eq!(days, 5.0);
    }

    #[test]
    fn test_single_weekday_counts_one() {
        let days = requested_days(date(2024, 6, 3), Some(date(2024, 6, 3)), false).unwrap();
        assert_eq!(days, 1.0);
    }

    #[test]
    fn test_single_saturday_counts_zero() {
        let days = requested_days(date(2024, 6, 8), Some(date(2024, 6, 8)), false).unwrap();
        assert_eq!(days, 0.0);
    }

    #[test]
    fn test_weekend_only_range_counts_zero() {
        // Sat + Sun
        let days = requested_days(date(2024, 6, 8), Some(date(2024, 6, 9)), false).unwrap();
        assert_eq!(days, 0.0);
    }

    #[test]
    fn test_missing_date_to_falls_back_to_single_day() {
        let days = requested_days(date(2024, 6, 4), None, false).unwrap();
        assert_eq!(days, 1.0);
    }

    #[test]
    fn test_half_day_is_half_regardless_of_date_to() {
        let days = requested_days(date(2024, 6, 3), Some(date(2024, 6, 28)), true).unwrap();
        assert_eq!(days, 0.5);

        let days = requested_days(date(2024, 6, 8), None, true).unwrap();
        assert_eq!(days, 0.5);
    }

    #[test]
    fn test_half_day_ignores_reversed_range() {
        let days = requested_days(date(2024, 6, 9), Some(date(2024, 6, 3)), true).unwrap();
        assert_eq!(days, 0.5);
    }

    #[test]
    fn test_reversed_range_fails_fast() {
        let err = requested_days(date(2024, 6, 9), Some(date(2024, 6, 3)), false).unwrap_err();
        assert_eq!(err, DomainError::InvalidRange);
    }

    #[test]
    fn test_result_bounded_by_calendar_span() {
        let from = date(2024, 1, 1);
        for offset in 0..60 {
            let to = from + Duration::days(offset);
            let days = requested_days(from, Some(to), false).unwrap();
            assert!(days >= 0.0);
            assert!(days <= (offset + 1) as f64);
        }
    }

    #[test]
    fn test_spans_month_boundary() {
        // Fri 2024-05-31 through Mon 2024-06-03
        assert_eq!(business_days(date(2024, 5, 31), date(2024, 6, 3)), 2);
    }
}
