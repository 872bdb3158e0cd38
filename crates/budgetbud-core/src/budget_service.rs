//! Budget and line-item lifecycle over an in-memory [`BudgetBook`].

use budgetbud_domain::{
    Budget, BudgetBook, CachedTotals, Category, Frequency, LineItem, LineItemKind, PeriodRange,
};
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{aggregate, cached_totals, resolve_period, Clock, CoreError};

/// User input for a new budget.
#[derive(Debug, Clone)]
pub struct BudgetDraft {
    pub name: Option<String>,
    pub frequency: Frequency,
    pub period_index: u32,
    pub total_income: f64,
    /// Year the period index is relative to; the clock's year when absent.
    pub year: Option<i32>,
}

impl BudgetDraft {
    pub fn new(frequency: Frequency, period_index: u32, total_income: f64) -> Self {
        Self {
            name: None,
            frequency,
            period_index,
            total_income,
            year: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Default budget name, e.g. `Monthly Budget: March`.
    pub fn default_name(&self) -> String {
        format!(
            "{} Budget: {}",
            self.frequency,
            self.frequency.period_label(self.period_index)
        )
    }
}

/// User input for a forecasted item or a recorded expense.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub budget_id: Uuid,
    pub category_id: String,
    pub amount: f64,
    pub kind: LineItemKind,
    /// Defaults to the clock's current date.
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewLineItem {
    pub fn forecasted(budget_id: Uuid, category_id: impl Into<String>, amount: f64) -> Self {
        Self::new(budget_id, category_id, amount, LineItemKind::Forecasted)
    }

    pub fn actual(budget_id: Uuid, category_id: impl Into<String>, amount: f64) -> Self {
        Self::new(budget_id, category_id, amount, LineItemKind::Actual)
    }

    fn new(
        budget_id: Uuid,
        category_id: impl Into<String>,
        amount: f64,
        kind: LineItemKind,
    ) -> Self {
        Self {
            budget_id,
            category_id: category_id.into(),
            amount,
            kind,
            date: None,
            notes: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Editable fields of an existing line item. The kind cannot change.
#[derive(Debug, Clone, Default)]
pub struct LineItemPatch {
    pub category_id: Option<String>,
    pub amount: Option<f64>,
    /// `Some("")` clears the note.
    pub notes: Option<String>,
}

/// Stateless budgeting operations that mutate a [`BudgetBook`] snapshot.
///
/// Every mutation that can change a budget's forecasted items recomputes its
/// cached totals from scratch. Persisting the book is the caller's job and
/// must go through `BookStorage::update_book` so the read-modify-write is atomic.
pub struct BudgetService;

impl BudgetService {
    pub fn create(
        book: &mut BudgetBook,
        draft: BudgetDraft,
        clock: &dyn Clock,
    ) -> Result<Uuid, CoreError> {
        if !draft.total_income.is_finite() || draft.total_income < 0.0 {
            return Err(CoreError::Validation(
                "income must be a non-negative amount".into(),
            ));
        }
        let year = draft.year.unwrap_or_else(|| clock.current_year());
        let range = resolve_period(draft.frequency, draft.period_index, year)?;
        let name = draft
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| draft.default_name());

        let budget = Budget::new(
            book.user_id.clone(),
            name,
            draft.frequency,
            draft.period_index,
            range,
            draft.total_income,
            clock.now(),
        );
        let id = budget.id;
        info!(budget = %id, name = %budget.name, range = %range, "budget created");
        book.budgets.push(budget);
        book.touch(clock.now());
        Ok(id)
    }

    pub fn add_item(
        book: &mut BudgetBook,
        new_item: NewLineItem,
        clock: &dyn Clock,
    ) -> Result<Uuid, CoreError> {
        validate_amount(new_item.amount)?;
        let owner = {
            let budget = owned_budget(book, new_item.budget_id)?;
            budget.user_id.clone()
        };
        warn_unknown_category(&new_item.category_id);

        let mut item = LineItem::new(
            owner,
            new_item.budget_id,
            new_item.category_id,
            new_item.amount,
            new_item.date.unwrap_or_else(|| clock.today()),
            new_item.kind,
            clock.now(),
        );
        if let Some(notes) = new_item.notes {
            item = item.with_notes(notes);
        }
        let id = item.id;
        debug!(item = %id, budget = %item.budget_id, kind = %item.kind(), "line item added");
        book.items.push(item);
        Self::refresh_cached_totals(book, new_item.budget_id, clock)?;
        Ok(id)
    }

    pub fn edit_item(
        book: &mut BudgetBook,
        item_id: Uuid,
        patch: LineItemPatch,
        clock: &dyn Clock,
    ) -> Result<(), CoreError> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }
        if let Some(category) = patch.category_id.as_deref() {
            warn_unknown_category(category);
        }
        let item = book
            .item_mut(item_id)
            .ok_or(CoreError::LineItemNotFound(item_id))?;
        if let Some(category) = patch.category_id {
            item.category_id = category;
        }
        if let Some(amount) = patch.amount {
            item.amount = amount;
        }
        if let Some(notes) = patch.notes {
            item.notes = Some(notes).filter(|notes| !notes.trim().is_empty());
        }
        item.updated_at = Some(clock.now());
        let budget_id = item.budget_id;
        Self::refresh_cached_totals(book, budget_id, clock)?;
        Ok(())
    }

    /// Flips the completion flag of a forecasted item and returns the new state.
    pub fn toggle_completed(
        book: &mut BudgetBook,
        item_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<bool, CoreError> {
        let item = book
            .item_mut(item_id)
            .ok_or(CoreError::LineItemNotFound(item_id))?;
        if !item.is_forecasted() {
            return Err(CoreError::InvalidOperation(
                "only forecasted items can be marked completed".into(),
            ));
        }
        let now = clock.now();
        item.completed = !item.completed;
        item.completed_at = item.completed.then_some(now);
        item.updated_at = Some(now);
        let completed = item.completed;
        book.touch(now);
        Ok(completed)
    }

    pub fn remove_item(
        book: &mut BudgetBook,
        item_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<LineItem, CoreError> {
        let position = book
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(CoreError::LineItemNotFound(item_id))?;
        let removed = book.items.remove(position);
        if book.budget(removed.budget_id).is_some() {
            Self::refresh_cached_totals(book, removed.budget_id, clock)?;
        } else {
            book.touch(clock.now());
        }
        Ok(removed)
    }

    /// Deletes a budget together with every line item filed under it.
    pub fn remove_budget(
        book: &mut BudgetBook,
        budget_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Budget, CoreError> {
        let position = book
            .budgets
            .iter()
            .position(|budget| budget.id == budget_id)
            .ok_or_else(|| CoreError::BudgetNotFound(budget_id.to_string()))?;
        let removed = book.budgets.remove(position);
        let before = book.items.len();
        book.items.retain(|item| item.budget_id != budget_id);
        info!(
            budget = %budget_id,
            items = before - book.items.len(),
            "budget removed"
        );
        book.touch(clock.now());
        Ok(removed)
    }

    /// Recomputes and stores a budget's cached totals from its line items.
    pub fn refresh_cached_totals(
        book: &mut BudgetBook,
        budget_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<CachedTotals, CoreError> {
        let budget = book
            .budget(budget_id)
            .ok_or_else(|| CoreError::BudgetNotFound(budget_id.to_string()))?;
        let totals = aggregate(budget, &book.items);
        let cached = cached_totals(budget.total_income, &totals);

        let now = clock.now();
        if let Some(budget) = book.budget_mut(budget_id) {
            if budget.cached != cached {
                debug!(budget = %budget_id, ?cached, "cached totals refreshed");
            }
            budget.cached = cached;
            budget.updated_at = Some(now);
        }
        book.touch(now);
        Ok(cached)
    }

    /// Recomputes cached totals for every budget, returning how many changed.
    pub fn refresh_all(book: &mut BudgetBook, clock: &dyn Clock) -> Result<usize, CoreError> {
        let ids: Vec<Uuid> = book.budgets.iter().map(|budget| budget.id).collect();
        let mut changed = 0;
        for id in ids {
            let before = book.budget(id).map(|budget| budget.cached);
            let after = Self::refresh_cached_totals(book, id, clock)?;
            if before != Some(after) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Line items dated within `range`, in their original order.
    pub fn items_in_period<'a, I>(items: I, range: PeriodRange) -> Vec<&'a LineItem>
    where
        I: IntoIterator<Item = &'a LineItem>,
    {
        items
            .into_iter()
            .filter(|item| range.contains(item.date))
            .collect()
    }
}

fn owned_budget(book: &BudgetBook, budget_id: Uuid) -> Result<&Budget, CoreError> {
    let budget = book
        .budget(budget_id)
        .ok_or_else(|| CoreError::BudgetNotFound(budget_id.to_string()))?;
    if budget.user_id != book.user_id {
        return Err(CoreError::InvalidOperation(format!(
            "budget {} belongs to another user",
            budget_id
        )));
    }
    Ok(budget)
}

fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(
            "amount must be greater than zero".into(),
        ));
    }
    Ok(())
}

fn warn_unknown_category(category_id: &str) {
    if Category::find(category_id).is_none() {
        warn!(category = category_id, "category is not in the catalog");
    }
}
