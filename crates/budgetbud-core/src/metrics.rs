//! Percentages and rankings derived from aggregated totals.

use std::collections::HashMap;

use budgetbud_domain::{Amounted, LineItem};

/// Savings as a percentage of income; zero when there is no positive income.
pub fn savings_rate(income: f64, savings: f64) -> f64 {
    if income > 0.0 {
        (savings / income) * 100.0
    } else {
        0.0
    }
}

/// Share of income already allocated, capped at 100.
pub fn allocation_percent(total_expenses: f64, income: f64) -> f64 {
    if income > 0.0 {
        ((total_expenses / income) * 100.0).min(100.0)
    } else {
        0.0
    }
}

/// Actual spend for one category and its share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category_id: String,
    pub amount: f64,
    pub percentage: f64,
}

/// Groups actual items by category, largest first.
///
/// Forecasted items are skipped. Ids outside the catalog are kept as-is.
/// Categories with equal amounts keep the order in which they were first seen.
pub fn category_breakdown<'a, I>(items: I, total_actual: f64) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let mut shares: Vec<CategoryShare> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for item in items.into_iter().filter(|item| item.is_actual()) {
        let slot = *positions.entry(item.category_id.as_str()).or_insert_with(|| {
            shares.push(CategoryShare {
                category_id: item.category_id.clone(),
                amount: 0.0,
                percentage: 0.0,
            });
            shares.len() - 1
        });
        shares[slot].amount += item.amount();
    }

    for share in &mut shares {
        share.percentage = if total_actual > 0.0 {
            (share.amount / total_actual) * 100.0
        } else {
            0.0
        };
    }

    shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    shares
}

/// The `limit` categories with the highest actual spend.
pub fn top_categories<'a, I>(items: I, total_actual: f64, limit: usize) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let mut shares = category_breakdown(items, total_actual);
    shares.truncate(limit);
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetbud_domain::LineItemKind;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn actual(category: &str, amount: f64) -> LineItem {
        LineItem::new(
            "u",
            Uuid::nil(),
            category,
            amount,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            LineItemKind::Actual,
            Utc::now(),
        )
    }

    #[test]
    fn savings_rate_guards_non_positive_income() {
        assert_eq!(savings_rate(1000.0, 100.0), 10.0);
        assert_eq!(savings_rate(0.0, 50.0), 0.0);
        assert_eq!(savings_rate(-5.0, 50.0), 0.0);
    }

    #[test]
    fn breakdown_reports_percentages() {
        let items = vec![actual("food", 150.0), actual("transport", 50.0)];
        let shares = category_breakdown(&items, 200.0);
        assert_eq!(
            shares,
            vec![
                CategoryShare {
                    category_id: "food".into(),
                    amount: 150.0,
                    percentage: 75.0,
                },
                CategoryShare {
                    category_id: "transport".into(),
                    amount: 50.0,
                    percentage: 25.0,
                },
            ]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let items = vec![
            actual("misc", 10.0),
            actual("food", 30.0),
            actual("utilities", 10.0),
            actual("misc", 0.0),
        ];
        let order: Vec<_> = category_breakdown(&items, 50.0)
            .into_iter()
            .map(|share| share.category_id)
            .collect();
        assert_eq!(order, ["food", "misc", "utilities"]);
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let items = vec![actual("food", 0.0)];
        let shares = category_breakdown(&items, 0.0);
        assert_eq!(shares[0].percentage, 0.0);
    }

    #[test]
    fn top_categories_truncates() {
        let items = vec![actual("a", 1.0), actual("b", 3.0), actual("c", 2.0)];
        let top = top_categories(&items, 6.0, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].category_id, "b");
        assert_eq!(top[1].category_id, "c");
    }

    #[test]
    fn allocation_is_capped() {
        assert_eq!(allocation_percent(1500.0, 1000.0), 100.0);
        assert_eq!(allocation_percent(250.0, 1000.0), 25.0);
        assert_eq!(allocation_percent(10.0, 0.0), 0.0);
    }
}
