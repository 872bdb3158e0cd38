//! A user's complete set of budgets and line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Budget, LineItem};

/// Everything one user owns; the unit storage reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BudgetBook {
    pub user_id: String,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BudgetBook {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn budget_mut(&mut self, id: Uuid) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|budget| budget.id == id)
    }

    pub fn item(&self, id: Uuid) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: Uuid) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Line items filed under the given budget, in insertion order.
    pub fn items_for(&self, budget_id: Uuid) -> impl Iterator<Item = &LineItem> {
        self.items
            .iter()
            .filter(move |item| item.budget_id == budget_id)
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}
