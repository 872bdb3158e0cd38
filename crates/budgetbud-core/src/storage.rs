use std::{collections::HashSet, path::PathBuf};

use budgetbud_domain::{BudgetBook, Category};
use chrono::Datelike;

use crate::{aggregate, cached_totals, resolve_period, CoreError};

/// Describes a persisted backup artifact for a book.
#[derive(Debug, Clone)]
pub struct BookBackupInfo {
    pub user_id: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Closure applied inside [`BookStorage::update_book`].
pub type BookUpdate<'a> = dyn FnMut(&mut BudgetBook) -> Result<(), CoreError> + 'a;

/// Abstraction over persistence backends capable of storing books and backups.
pub trait BookStorage: Send + Sync {
    /// Loads a user's book, returning an empty one when nothing is stored yet.
    fn load_book(&self, user_id: &str) -> Result<BudgetBook, CoreError>;
    fn save_book(&self, book: &BudgetBook) -> Result<(), CoreError>;
    fn list_users(&self) -> Result<Vec<String>, CoreError>;
    fn delete_book(&self, user_id: &str) -> Result<(), CoreError>;

    /// Atomic read-modify-write of one user's book.
    ///
    /// Implementations must serialize concurrent updates for the same user and
    /// persist nothing when `update` fails. Returns the stored book.
    fn update_book(
        &self,
        user_id: &str,
        update: &mut BookUpdate<'_>,
    ) -> Result<BudgetBook, CoreError>;

    fn backup_book(&self, user_id: &str, note: Option<&str>) -> Result<BookBackupInfo, CoreError>;
    fn list_backups(&self, user_id: &str) -> Result<Vec<BookBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &BookBackupInfo) -> Result<BudgetBook, CoreError>;
}

/// Detects dangling references and drifted caches within a book snapshot.
pub fn book_warnings(book: &BudgetBook) -> Vec<String> {
    let budget_ids: HashSet<_> = book.budgets.iter().map(|budget| budget.id).collect();
    let mut warnings = Vec::new();

    for budget in &book.budgets {
        if budget.user_id != book.user_id {
            warnings.push(format!(
                "budget {} is owned by `{}`, not `{}`",
                budget.id, budget.user_id, book.user_id
            ));
        }
        match resolve_period(budget.frequency, budget.period_index, budget.start_date.year()) {
            Ok(range) if range != budget.range() => warnings.push(format!(
                "budget {} stores {} but its period resolves to {}",
                budget.id,
                budget.range(),
                range
            )),
            Ok(_) => {}
            Err(err) => warnings.push(format!("budget {}: {}", budget.id, err)),
        }
        let expected = cached_totals(budget.total_income, &aggregate(budget, &book.items));
        if (expected.total_expenses - budget.cached.total_expenses).abs() > 1e-9
            || (expected.savings - budget.cached.savings).abs() > 1e-9
        {
            warnings.push(format!(
                "budget {} cached totals drifted from its line items",
                budget.id
            ));
        }
    }

    for item in &book.items {
        if !budget_ids.contains(&item.budget_id) {
            warnings.push(format!(
                "line item {} references missing budget {}",
                item.id, item.budget_id
            ));
        }
        if item.user_id != book.user_id {
            warnings.push(format!(
                "line item {} is owned by `{}`, not `{}`",
                item.id, item.user_id, book.user_id
            ));
        }
        if Category::find(&item.category_id).is_none() {
            warnings.push(format!(
                "line item {} references unknown category `{}`",
                item.id, item.category_id
            ));
        }
    }
    warnings
}
