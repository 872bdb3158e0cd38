//! Forecasted budget items and recorded expenses share one record shape.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::SAVINGS_CATEGORY_ID;

/// Distinguishes planned amounts from recorded spend. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LineItemKind {
    Forecasted,
    Actual,
}

impl fmt::Display for LineItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LineItemKind::Forecasted => "Forecasted",
            LineItemKind::Actual => "Actual",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: Uuid,
    pub user_id: String,
    pub budget_id: Uuid,
    pub category_id: String,
    /// Records stored without an amount read back as zero.
    #[serde(default)]
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    kind: LineItemKind,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LineItem {
    pub fn new(
        user_id: impl Into<String>,
        budget_id: Uuid,
        category_id: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        kind: LineItemKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            budget_id,
            category_id: category_id.into(),
            amount,
            date,
            notes: None,
            kind,
            completed: false,
            completed_at: None,
            created_at,
            updated_at: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }

    pub fn kind(&self) -> LineItemKind {
        self.kind
    }

    pub fn is_forecasted(&self) -> bool {
        self.kind == LineItemKind::Forecasted
    }

    pub fn is_actual(&self) -> bool {
        self.kind == LineItemKind::Actual
    }

    /// True when filed under the savings category, ignoring case.
    pub fn is_savings(&self) -> bool {
        self.category_id.eq_ignore_ascii_case(SAVINGS_CATEGORY_ID)
    }
}

impl Identifiable for LineItem {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for LineItem {
    fn amount(&self) -> f64 {
        if self.amount.is_finite() {
            self.amount
        } else {
            0.0
        }
    }
}

impl Displayable for LineItem {
    fn display_label(&self) -> String {
        format!("{} {} {:.2}", self.kind, self.category_id, self.amount)
    }
}
