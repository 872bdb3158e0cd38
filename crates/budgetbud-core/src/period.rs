//! Maps a frequency and 1-based period index onto calendar dates.

use budgetbud_domain::{Frequency, PeriodRange};
use chrono::{Datelike, Duration, NaiveDate};

use crate::CoreError;

/// Resolves the inclusive date range of period `index` within `year`.
///
/// Weeks and bi-weeks are counted in fixed 7 and 14 day blocks from
/// January 1st, not ISO weeks. Months are calendar months. Indices outside
/// `1..=frequency.period_count()` are rejected.
pub fn resolve_period(
    frequency: Frequency,
    index: u32,
    year: i32,
) -> Result<PeriodRange, CoreError> {
    let max = frequency.period_count();
    if index == 0 || index > max {
        return Err(CoreError::PeriodOutOfRange {
            frequency,
            index,
            max,
        });
    }

    let (start, end) = match frequency.fixed_days() {
        Some(block) => {
            let start = first_of_year(year)? + Duration::days(i64::from(index - 1) * block);
            (start, start + Duration::days(block - 1))
        }
        None => {
            let start = month_start(year, index)?;
            let next = if index == 12 {
                month_start(year + 1, 1)?
            } else {
                month_start(year, index + 1)?
            };
            (start, next - Duration::days(1))
        }
    };

    PeriodRange::new(start, end).map_err(|err| CoreError::Validation(err.to_string()))
}

/// Returns the index of the period containing `date` in its own year.
///
/// The last one or two days of a year fall after week 52 and bi-week 26;
/// those yield `None`.
pub fn period_containing(frequency: Frequency, date: NaiveDate) -> Option<u32> {
    let index = match frequency.fixed_days() {
        Some(block) => (i64::from(date.ordinal0()) / block + 1) as u32,
        None => date.month(),
    };
    (index <= frequency.period_count()).then_some(index)
}

fn first_of_year(year: i32) -> Result<NaiveDate, CoreError> {
    month_start(year, 1)
}

fn month_start(year: i32, month: u32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::Validation(format!("year {year} is outside the supported range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_february_in_leap_year() {
        let range = resolve_period(Frequency::Monthly, 2, 2024).unwrap();
        assert_eq!(range.start_date, date(2024, 2, 1));
        assert_eq!(range.end_date, date(2024, 2, 29));
    }

    #[test]
    fn december_ends_on_the_31st() {
        let range = resolve_period(Frequency::Monthly, 12, 2023).unwrap();
        assert_eq!(range.start_date, date(2023, 12, 1));
        assert_eq!(range.end_date, date(2023, 12, 31));
    }

    #[test]
    fn weekly_blocks_start_on_january_first() {
        let first = resolve_period(Frequency::Weekly, 1, 2025).unwrap();
        assert_eq!(first.start_date, date(2025, 1, 1));
        assert_eq!(first.end_date, date(2025, 1, 7));

        let last = resolve_period(Frequency::Weekly, 52, 2025).unwrap();
        assert_eq!(last.start_date, date(2025, 12, 24));
        assert_eq!(last.end_date, date(2025, 12, 30));
    }

    #[test]
    fn biweekly_blocks_span_fourteen_days() {
        let range = resolve_period(Frequency::Biweekly, 2, 2024).unwrap();
        assert_eq!(range.start_date, date(2024, 1, 15));
        assert_eq!(range.end_date, date(2024, 1, 28));
        assert_eq!(range.days(), 14);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        for (frequency, index) in [
            (Frequency::Weekly, 0),
            (Frequency::Weekly, 53),
            (Frequency::Biweekly, 27),
            (Frequency::Monthly, 13),
        ] {
            let err = resolve_period(frequency, index, 2024).unwrap_err();
            assert!(
                matches!(err, CoreError::PeriodOutOfRange { index: i, .. } if i == index),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn period_containing_inverts_resolution() {
        assert_eq!(period_containing(Frequency::Weekly, date(2024, 1, 8)), Some(2));
        assert_eq!(period_containing(Frequency::Biweekly, date(2024, 1, 14)), Some(1));
        assert_eq!(period_containing(Frequency::Monthly, date(2024, 7, 31)), Some(7));
        assert_eq!(period_containing(Frequency::Weekly, date(2024, 12, 31)), None);
    }
}
