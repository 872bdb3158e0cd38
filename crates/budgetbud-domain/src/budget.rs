//! Budget records: one spending plan for one period.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::{Frequency, PeriodRange};

/// Denormalized totals stored on a budget for fast listing.
///
/// These are a projection of the budget's forecasted items and must be
/// recomputed as a whole, never patched incrementally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CachedTotals {
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub savings: f64,
}

impl CachedTotals {
    /// Totals for a budget with no items yet.
    pub fn initial(total_income: f64) -> Self {
        Self {
            total_expenses: 0.0,
            savings: total_income,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub frequency: Frequency,
    pub period_index: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub total_income: f64,
    #[serde(flatten)]
    pub cached: CachedTotals,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Budget {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        frequency: Frequency,
        period_index: u32,
        range: PeriodRange,
        total_income: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: name.into(),
            frequency,
            period_index,
            start_date: range.start_date,
            end_date: range.end_date,
            total_income,
            cached: CachedTotals::initial(total_income),
            created_at,
            updated_at: None,
        }
    }

    pub fn range(&self) -> PeriodRange {
        PeriodRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    pub fn period_label(&self) -> String {
        self.frequency.period_label(self.period_index)
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Budget {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.frequency, self.range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_totals_flatten_into_budget_record() {
        let range = PeriodRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap();
        let budget = Budget::new("u", "Week", Frequency::Weekly, 1, range, 500.0, Utc::now());
        let value = serde_json::to_value(&budget).unwrap();
        assert_eq!(value["savings"], 500.0);
        assert_eq!(value["total_expenses"], 0.0);
        assert_eq!(value["frequency"], "weekly");
    }
}
