use budgetbud_core::{aggregate, category_breakdown, resolve_period, savings_rate};
use budgetbud_domain::{Budget, Frequency, LineItem, LineItemKind};
use chrono::{Duration, NaiveDate, Utc};

fn budget(income: f64) -> Budget {
    let range = resolve_period(Frequency::Monthly, 6, 2024).expect("june");
    Budget::new("tester", "June", Frequency::Monthly, 6, range, income, Utc::now())
}

fn item(budget: &Budget, category: &str, amount: f64, kind: LineItemKind) -> LineItem {
    LineItem::new(
        "tester",
        budget.id,
        category,
        amount,
        budget.start_date,
        kind,
        Utc::now(),
    )
}

fn mixed_items(budget: &Budget) -> Vec<LineItem> {
    let amounts = [0.1, 0.2, 0.3, 19.99, 1e6, 3.333, 42.0, 0.07, 7.5, 1234.56];
    let categories = ["savings", "food", "Savings", "misc", "utilities"];
    amounts
        .iter()
        .enumerate()
        .map(|(idx, amount)| {
            let kind = if idx % 3 == 0 {
                LineItemKind::Actual
            } else {
                LineItemKind::Forecasted
            };
            item(budget, categories[idx % categories.len()], *amount, kind)
        })
        .collect()
}

#[test]
fn resolve_period_is_idempotent() {
    for frequency in Frequency::ALL {
        for index in 1..=frequency.period_count() {
            let first = resolve_period(frequency, index, 2023).unwrap();
            let second = resolve_period(frequency, index, 2023).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn weekly_periods_tile_the_year_without_gaps() {
    for year in [2023, 2024] {
        for index in 1..52 {
            let current = resolve_period(Frequency::Weekly, index, year).unwrap();
            let next = resolve_period(Frequency::Weekly, index + 1, year).unwrap();
            assert_eq!(current.end_date + Duration::days(1), next.start_date);
        }
    }
}

#[test]
fn biweekly_and_monthly_periods_are_contiguous() {
    for index in 1..26 {
        let current = resolve_period(Frequency::Biweekly, index, 2024).unwrap();
        let next = resolve_period(Frequency::Biweekly, index + 1, 2024).unwrap();
        assert_eq!(current.next_start(), next.start_date);
    }
    for index in 1..12 {
        let current = resolve_period(Frequency::Monthly, index, 2025).unwrap();
        let next = resolve_period(Frequency::Monthly, index + 1, 2025).unwrap();
        assert_eq!(current.next_start(), next.start_date);
    }
}

#[test]
fn monthly_february_scenario() {
    let range = resolve_period(Frequency::Monthly, 2, 2024).unwrap();
    assert_eq!(range.start_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(range.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

    let range = resolve_period(Frequency::Monthly, 2, 2023).unwrap();
    assert_eq!(range.end_date, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
}

#[test]
fn aggregation_ignores_item_order() {
    let budget = budget(5000.0);
    let items = mixed_items(&budget);
    let expected = aggregate(&budget, &items);

    let mut reversed = items.clone();
    reversed.reverse();
    assert_eq!(aggregate(&budget, &reversed), expected);

    for shift in 1..items.len() {
        let mut rotated = items.clone();
        rotated.rotate_left(shift);
        assert_eq!(aggregate(&budget, &rotated), expected);
    }

    let mut interleaved: Vec<LineItem> = items.iter().step_by(2).cloned().collect();
    interleaved.extend(items.iter().skip(1).step_by(2).cloned());
    assert_eq!(aggregate(&budget, &interleaved), expected);
}

#[test]
fn savings_rate_zero_income_guard() {
    for savings in [0.0, 10.0, -3.0, 1e9] {
        assert_eq!(savings_rate(0.0, savings), 0.0);
        assert_eq!(savings_rate(-5.0, savings), 0.0);
    }
    assert_eq!(savings_rate(1000.0, 100.0), 10.0);
}

#[test]
fn breakdown_amounts_sum_to_total_actual() {
    let budget = budget(5000.0);
    let items = mixed_items(&budget);
    let totals = aggregate(&budget, &items);
    let shares = category_breakdown(&items, totals.total_actual);

    let summed: f64 = shares.iter().map(|share| share.amount).sum();
    assert!((summed - totals.total_actual).abs() < 1e-6);

    let percent: f64 = shares.iter().map(|share| share.percentage).sum();
    assert!((percent - 100.0).abs() < 1e-6);

    for pair in shares.windows(2) {
        assert!(pair[0].amount >= pair[1].amount);
    }
}

#[test]
fn unknown_categories_survive_breakdown() {
    let budget = budget(100.0);
    let items = vec![
        item(&budget, "food", 150.0, LineItemKind::Actual),
        item(&budget, "transport", 50.0, LineItemKind::Actual),
        item(&budget, "food", 999.0, LineItemKind::Forecasted),
    ];
    let shares = category_breakdown(&items, 200.0);
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].category_id, "food");
    assert_eq!(shares[0].percentage, 75.0);
    assert_eq!(shares[1].category_id, "transport");
    assert_eq!(shares[1].percentage, 25.0);
}
