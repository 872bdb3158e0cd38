//! Resolves user-typed references to budgets and line items.

use budgetbud_domain::{Budget, BudgetBook, Identifiable};
use uuid::Uuid;

use crate::cli::core::CommandError;

/// Budgets in the order `budgets` lists them: by start date, then creation order.
pub fn ordered_budgets(book: &BudgetBook) -> Vec<&Budget> {
    let mut budgets: Vec<&Budget> = book.budgets.iter().collect();
    budgets.sort_by_key(|budget| budget.start_date);
    budgets
}

/// Accepts a 1-based list position or an id prefix.
pub fn resolve_budget(book: &BudgetBook, reference: &str) -> Result<Uuid, CommandError> {
    let budgets = ordered_budgets(book);
    if let Ok(position) = reference.parse::<usize>() {
        if let Some(budget) = position.checked_sub(1).and_then(|idx| budgets.get(idx)) {
            return Ok(budget.id);
        }
    }
    unique_prefix("budget", reference, budgets.iter().copied())
}

pub fn resolve_item(book: &BudgetBook, reference: &str) -> Result<Uuid, CommandError> {
    unique_prefix("line item", reference, book.items.iter())
}

/// First eight hex digits, the form ids are displayed in.
pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

fn unique_prefix<'a, T, I>(
    what: &str,
    reference: &str,
    entities: I,
) -> Result<Uuid, CommandError>
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let needle: String = reference
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| *c != '-')
        .collect();
    if needle.is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "a {what} reference is required"
        )));
    }
    let mut matches = entities
        .into_iter()
        .map(Identifiable::id)
        .filter(|id| id.simple().to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(CommandError::InvalidArguments(format!(
            "no {what} matches `{reference}`"
        ))),
        (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
            "`{reference}` matches more than one {what}; type more of the id"
        ))),
    }
}
