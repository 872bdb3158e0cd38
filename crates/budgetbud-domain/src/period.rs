//! Budget frequencies and the calendar ranges they resolve to.

use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Enumerates the supported budgeting cadences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Weekly,
    #[serde(alias = "bi-weekly")]
    Biweekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Weekly, Frequency::Biweekly, Frequency::Monthly];

    /// Number of selectable periods in one calendar year.
    pub fn period_count(self) -> u32 {
        match self {
            Frequency::Weekly => 52,
            Frequency::Biweekly => 26,
            Frequency::Monthly => 12,
        }
    }

    /// Length of one period in days, `None` for calendar months.
    pub fn fixed_days(self) -> Option<i64> {
        match self {
            Frequency::Weekly => Some(7),
            Frequency::Biweekly => Some(14),
            Frequency::Monthly => None,
        }
    }

    /// Average number of periods that fit into one calendar month.
    pub fn periods_per_month(self) -> f64 {
        match self {
            Frequency::Weekly => 52.0 / 12.0,
            Frequency::Biweekly => 26.0 / 12.0,
            Frequency::Monthly => 1.0,
        }
    }

    /// Returns the short unit label used when naming a period (`Week 3`).
    pub fn unit_label(self) -> &'static str {
        match self {
            Frequency::Weekly => "Week",
            Frequency::Biweekly => "Bi-week",
            Frequency::Monthly => "Month",
        }
    }

    /// Human label for a period index, e.g. `Week 3`, `Bi-week 2` or `March`.
    pub fn period_label(self, index: u32) -> String {
        match self {
            Frequency::Monthly => index
                .checked_sub(1)
                .and_then(|idx| MONTH_NAMES.get(idx as usize))
                .map(|name| (*name).to_string())
                .unwrap_or_else(|| format!("Month {index}")),
            other => format!("{} {}", other.unit_label(), index),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Biweekly",
            Frequency::Monthly => "Monthly",
        };
        f.write_str(label)
    }
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" | "bi-weekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(ParseFrequencyError(value.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFrequencyError(pub String);

impl fmt::Display for ParseFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown frequency `{}` (expected weekly, biweekly or monthly)",
            self.0
        )
    }
}

impl std::error::Error for ParseFrequencyError {}

/// Inclusive calendar range covered by one budget period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PeriodRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PeriodRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, PeriodRangeError> {
        if end_date < start_date {
            return Err(PeriodRangeError::EndBeforeStart);
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// First day after the range.
    pub fn next_start(&self) -> NaiveDate {
        self.end_date + Duration::days(1)
    }
}

impl fmt::Display for PeriodRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodRangeError {
    EndBeforeStart,
}

impl fmt::Display for PeriodRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodRangeError::EndBeforeStart => f.write_str("period end must not precede start"),
        }
    }
}

impl std::error::Error for PeriodRangeError {}
