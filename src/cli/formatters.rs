//! Plain-text renderings of budgets and reports.

use budgetbud_core::{
    allocation_percent, Analytics, BudgetDetail, CategoryShare, DashboardStats,
    SavingsTrendPoint,
};
use budgetbud_core::storage::BookBackupInfo;
use budgetbud_domain::{Budget, Category, LineItem};

use crate::cli::selectors::short_id;

pub fn money(value: f64, currency: &str) -> String {
    format!("{currency} {value:.2}")
}

fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn categories() -> String {
    Category::catalog()
        .iter()
        .map(|category| {
            format!(
                "{:<14}{:<20}{}",
                category.id,
                category.name,
                category.kind.to_string().to_lowercase()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn budget_table(budgets: &[&Budget], currency: &str) -> String {
    if budgets.is_empty() {
        return "No budgets yet. Create one with `new-budget`.".into();
    }
    let mut lines = vec![format!(
        "{:>3}  {:<8}  {:<28}  {:<23}  {:>14}  {:>14}  {:>14}  {:>6}",
        "#", "id", "name", "period", "income", "planned", "savings", "alloc"
    )];
    for (position, budget) in budgets.iter().enumerate() {
        lines.push(format!(
            "{:>3}  {:<8}  {:<28}  {:<23}  {:>14}  {:>14}  {:>14}  {:>6}",
            position + 1,
            short_id(budget.id),
            truncate(&budget.name, 28),
            budget.range().to_string(),
            money(budget.total_income, currency),
            money(budget.cached.total_expenses, currency),
            money(budget.cached.savings, currency),
            percent(allocation_percent(
                budget.cached.total_expenses,
                budget.total_income
            )),
        ));
    }
    lines.join("\n")
}

pub fn budget_detail(detail: &BudgetDetail<'_>, currency: &str) -> String {
    let budget = detail.budget;
    let totals = &detail.totals;
    let range = budget.range();
    let mut lines = vec![
        format!(
            "{} ({}, {})",
            budget.name,
            budget.frequency,
            budget.period_label()
        ),
        format!("Period:          {} ({} days)", range, range.days()),
        format!("Income:          {}", money(budget.total_income, currency)),
        format!("Forecasted:      {}", money(totals.total_forecasted, currency)),
        format!("Actual:          {}", money(totals.total_actual, currency)),
        format!(
            "Savings:         {} ({} of income)",
            money(totals.total_savings, currency),
            percent(detail.savings_rate)
        ),
        format!(
            "Planned savings: {}",
            money(totals.planned_savings(budget.total_income), currency)
        ),
        format!("Remaining:       {}", money(totals.remaining_funds, currency)),
        format!("Allocated:       {}", percent(detail.allocation_percent)),
        String::new(),
        "Forecasted items:".into(),
    ];
    lines.extend(item_lines(&detail.forecasted, currency, true));
    lines.push("Actual expenses:".into());
    lines.extend(item_lines(&detail.actual, currency, false));
    if !detail.breakdown.is_empty() {
        lines.push("Spending by category:".into());
        lines.extend(share_lines(&detail.breakdown, currency));
    }
    lines.join("\n")
}

/// Items of every budget dated inside one period, planned before spent.
pub fn period_items(items: &[&LineItem], currency: &str) -> String {
    let (forecasted, actual): (Vec<&LineItem>, Vec<&LineItem>) =
        items.iter().copied().partition(|item| item.is_forecasted());
    let mut lines = vec!["Forecasted items:".to_string()];
    lines.extend(item_lines(&forecasted, currency, true));
    lines.push("Actual expenses:".into());
    lines.extend(item_lines(&actual, currency, false));
    lines.join("\n")
}

fn item_lines(items: &[&LineItem], currency: &str, show_completion: bool) -> Vec<String> {
    if items.is_empty() {
        return vec!["  (none)".into()];
    }
    items
        .iter()
        .map(|item| {
            let marker = match (show_completion, item.completed) {
                (false, _) => String::new(),
                (true, true) => "[x] ".into(),
                (true, false) => "[ ] ".into(),
            };
            let mut line = format!(
                "  {marker}{}  {}  {:<20}{:>14}",
                short_id(item.id),
                item.date,
                Category::label_for(&item.category_id),
                money(item.amount, currency)
            );
            if let Some(notes) = &item.notes {
                line.push_str("  ");
                line.push_str(notes);
            }
            line
        })
        .collect()
}

fn share_lines(shares: &[CategoryShare], currency: &str) -> Vec<String> {
    shares
        .iter()
        .map(|share| {
            format!(
                "  {:<20}{:>14}  {:>6}",
                Category::label_for(&share.category_id),
                money(share.amount, currency),
                percent(share.percentage)
            )
        })
        .collect()
}

pub fn dashboard(stats: &DashboardStats, budget_count: usize, currency: &str) -> String {
    [
        format!("Budgets:        {budget_count}"),
        format!("Total income:   {}", money(stats.total_income, currency)),
        format!("Total expenses: {}", money(stats.total_expenses, currency)),
        format!("Savings:        {}", money(stats.savings, currency)),
    ]
    .join("\n")
}

pub fn analytics(report: &Analytics, currency: &str) -> String {
    let mut lines = vec![
        format!("Total income:             {}", money(report.total_income, currency)),
        format!("Total savings:            {}", money(report.total_savings, currency)),
        format!("Savings rate:             {}", percent(report.savings_rate)),
        format!(
            "Average monthly savings:  {}",
            money(report.monthly_average_savings, currency)
        ),
        format!(
            "Projected annual savings: {}",
            money(report.projected_annual_savings, currency)
        ),
    ];
    if !report.top_categories.is_empty() {
        lines.push(String::new());
        lines.push("Top expense categories:".into());
        lines.extend(share_lines(&report.top_categories, currency));
    }
    if !report.monthly_trends.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{:<10}{:>14}{:>14}{:>14}",
            "month", "income", "planned", "savings"
        ));
        for trend in &report.monthly_trends {
            lines.push(format!(
                "{:<10}{:>14}{:>14}{:>14}",
                trend.month.format("%Y-%m").to_string(),
                money(trend.income, currency),
                money(trend.expenses, currency),
                money(trend.savings, currency)
            ));
        }
    }
    lines.join("\n")
}

pub fn savings_trend(points: &[SavingsTrendPoint], currency: &str) -> String {
    if points.is_empty() {
        return "No budgets to chart yet.".into();
    }
    let mut lines = vec![format!(
        "{:<12}{:<28}{:>14}{:>14}",
        "start", "budget", "savings", "cumulative"
    )];
    lines.extend(points.iter().map(|point| {
        format!(
            "{:<12}{:<28}{:>14}{:>14}",
            point.start_date.to_string(),
            truncate(&point.name, 26),
            money(point.savings, currency),
            money(point.cumulative, currency)
        )
    }));
    lines.join("\n")
}

pub fn backups(entries: &[BookBackupInfo]) -> String {
    if entries.is_empty() {
        return "No backups yet. Create one with `backup create`.".into();
    }
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| format!("{:>3}  {}  {}", idx + 1, entry.created_at, entry.id))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_renders_aligned_totals() {
        let stats = DashboardStats {
            total_income: 1300.0,
            total_expenses: 150.0,
            savings: 1150.0,
        };
        insta::assert_snapshot!(dashboard(&stats, 2, "USD"), @r###"
        Budgets:        2
        Total income:   USD 1300.00
        Total expenses: USD 150.00
        Savings:        USD 1150.00
        "###);
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("Groceries", 20), "Groceries");
        assert_eq!(truncate("Monthly Budget: September", 10), "Monthly B…");
    }
}
