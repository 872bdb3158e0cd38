//! Budget-level totals derived from line items.

use budgetbud_domain::{Amounted, Budget, CachedTotals, LineItem};

/// Read-side totals for one budget.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedgerTotals {
    pub total_forecasted: f64,
    pub total_actual: f64,
    pub total_savings: f64,
    pub remaining_funds: f64,
}

impl LedgerTotals {
    /// Income left after the planned items, the value cached on the budget as `savings`.
    pub fn planned_savings(&self, total_income: f64) -> f64 {
        total_income - self.total_forecasted
    }
}

/// Sums the items belonging to `budget`; items of other budgets are ignored.
///
/// Never touches the budget's cached totals. Each bucket is sorted before
/// summing so any permutation of `items` yields bit-identical totals.
pub fn aggregate<'a, I>(budget: &Budget, items: I) -> LedgerTotals
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let mut forecasted = Vec::new();
    let mut actual = Vec::new();
    let mut savings = Vec::new();

    for item in items.into_iter().filter(|item| item.budget_id == budget.id) {
        let amount = item.amount();
        if item.is_forecasted() {
            forecasted.push(amount);
            if item.is_savings() {
                savings.push(amount);
            }
        } else {
            actual.push(amount);
        }
    }

    let total_actual = canonical_sum(&mut actual);
    LedgerTotals {
        total_forecasted: canonical_sum(&mut forecasted),
        total_actual,
        total_savings: canonical_sum(&mut savings),
        remaining_funds: budget.total_income - total_actual,
    }
}

/// Projects aggregated totals onto the pair stored on the budget record.
pub fn cached_totals(total_income: f64, totals: &LedgerTotals) -> CachedTotals {
    CachedTotals {
        total_expenses: totals.total_forecasted,
        savings: totals.planned_savings(total_income),
    }
}

pub(crate) fn canonical_sum(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetbud_domain::{Frequency, LineItemKind, PeriodRange};
    use chrono::{NaiveDate, Utc};

    fn budget(income: f64) -> Budget {
        let range = PeriodRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap();
        Budget::new("u", "March", Frequency::Monthly, 3, range, income, Utc::now())
    }

    fn item(budget: &Budget, category: &str, amount: f64, kind: LineItemKind) -> LineItem {
        LineItem::new(
            "u",
            budget.id,
            category,
            amount,
            budget.start_date,
            kind,
            Utc::now(),
        )
    }

    #[test]
    fn forecasted_actual_and_savings_scenario() {
        let budget = budget(1000.0);
        let items = vec![
            item(&budget, "savings", 100.0, LineItemKind::Forecasted),
            item(&budget, "food", 200.0, LineItemKind::Forecasted),
            item(&budget, "food", 150.0, LineItemKind::Actual),
        ];
        let totals = aggregate(&budget, &items);
        assert_eq!(
            totals,
            LedgerTotals {
                total_forecasted: 300.0,
                total_actual: 150.0,
                total_savings: 100.0,
                remaining_funds: 850.0,
            }
        );
    }

    #[test]
    fn actual_savings_items_do_not_count_as_saved() {
        let budget = budget(500.0);
        let items = vec![item(&budget, "SAVINGS", 50.0, LineItemKind::Actual)];
        let totals = aggregate(&budget, &items);
        assert_eq!(totals.total_savings, 0.0);
        assert_eq!(totals.remaining_funds, 450.0);
    }

    #[test]
    fn foreign_budget_items_are_filtered_out() {
        let budget = budget(300.0);
        let other = self::budget(300.0);
        let items = vec![
            item(&other, "food", 80.0, LineItemKind::Actual),
            item(&budget, "food", 20.0, LineItemKind::Actual),
        ];
        assert_eq!(aggregate(&budget, &items).total_actual, 20.0);
    }

    #[test]
    fn cached_projection_matches_planned_savings() {
        let budget = budget(1000.0);
        let items = vec![item(&budget, "food", 250.0, LineItemKind::Forecasted)];
        let cached = cached_totals(budget.total_income, &aggregate(&budget, &items));
        assert_eq!(cached.total_expenses, 250.0);
        assert_eq!(cached.savings, 750.0);
    }
}
