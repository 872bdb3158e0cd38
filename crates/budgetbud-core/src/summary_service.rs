//! Read-only views over a book: budget detail, dashboard, analytics, trends.

use std::collections::BTreeMap;

use budgetbud_domain::{Amounted, Budget, BudgetBook, LineItem};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::aggregate::canonical_sum;
use crate::{
    aggregate, allocation_percent, category_breakdown, savings_rate, top_categories,
    CategoryShare, CoreError, LedgerTotals,
};

/// Everything the budget detail view shows.
#[derive(Debug, Clone)]
pub struct BudgetDetail<'a> {
    pub budget: &'a Budget,
    pub forecasted: Vec<&'a LineItem>,
    pub actual: Vec<&'a LineItem>,
    pub totals: LedgerTotals,
    /// Forecasted savings as a percentage of income.
    pub savings_rate: f64,
    pub allocation_percent: f64,
    pub breakdown: Vec<CategoryShare>,
}

/// Headline numbers across every budget of a user.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub savings: f64,
}

/// Planned figures of all budgets starting in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    /// First day of the month.
    pub month: NaiveDate,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub total_savings: f64,
    pub total_income: f64,
    pub savings_rate: f64,
    pub monthly_average_savings: f64,
    pub projected_annual_savings: f64,
    pub top_categories: Vec<CategoryShare>,
    pub monthly_trends: Vec<MonthlyTrend>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavingsTrendPoint {
    pub budget_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub cumulative: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn budget_detail(book: &BudgetBook, budget_id: Uuid) -> Result<BudgetDetail<'_>, CoreError> {
        let budget = book
            .budget(budget_id)
            .ok_or_else(|| CoreError::BudgetNotFound(budget_id.to_string()))?;
        let (forecasted, actual): (Vec<_>, Vec<_>) =
            book.items_for(budget_id).partition(|item| item.is_forecasted());
        let totals = aggregate(budget, &book.items);
        let breakdown = category_breakdown(actual.iter().copied(), totals.total_actual);
        Ok(BudgetDetail {
            budget,
            forecasted,
            actual,
            totals,
            savings_rate: savings_rate(budget.total_income, totals.total_savings),
            allocation_percent: allocation_percent(totals.total_forecasted, budget.total_income),
            breakdown,
        })
    }

    /// Income of every budget against every recorded expense.
    pub fn dashboard(book: &BudgetBook) -> DashboardStats {
        let total_income = canonical_sum(&mut incomes(&book.budgets));
        let mut spent: Vec<f64> = actual_items(book).map(Amounted::amount).collect();
        let total_expenses = canonical_sum(&mut spent);
        DashboardStats {
            total_income,
            total_expenses,
            savings: total_income - total_expenses,
        }
    }

    pub fn analytics(book: &BudgetBook, top_n: usize) -> Analytics {
        let planned: Vec<(&Budget, f64, f64)> = book
            .budgets
            .iter()
            .map(|budget| {
                let totals = aggregate(budget, &book.items);
                (
                    budget,
                    totals.total_forecasted,
                    totals.planned_savings(budget.total_income),
                )
            })
            .collect();

        let total_income = canonical_sum(&mut incomes(&book.budgets));
        let total_savings = canonical_sum(&mut planned.iter().map(|p| p.2).collect::<Vec<_>>());

        let monthly_average_savings = if planned.is_empty() {
            0.0
        } else {
            let mut scaled: Vec<f64> = planned
                .iter()
                .map(|(budget, _, savings)| savings * budget.frequency.periods_per_month())
                .collect();
            canonical_sum(&mut scaled) / planned.len() as f64
        };

        let mut spent: Vec<f64> = actual_items(book).map(Amounted::amount).collect();
        let total_actual = canonical_sum(&mut spent);

        let mut months: BTreeMap<NaiveDate, MonthlyTrend> = BTreeMap::new();
        for (budget, expenses, savings) in &planned {
            let month = first_of_month(budget.start_date);
            let entry = months.entry(month).or_insert(MonthlyTrend {
                month,
                income: 0.0,
                expenses: 0.0,
                savings: 0.0,
            });
            entry.income += budget.total_income;
            entry.expenses += expenses;
            entry.savings += savings;
        }

        Analytics {
            total_savings,
            total_income,
            savings_rate: savings_rate(total_income, total_savings),
            monthly_average_savings,
            projected_annual_savings: monthly_average_savings * 12.0,
            top_categories: top_categories(actual_items(book), total_actual, top_n),
            monthly_trends: months.into_values().collect(),
        }
    }

    /// Budgets in start-date order with running planned savings.
    pub fn savings_trend(book: &BudgetBook) -> Vec<SavingsTrendPoint> {
        let mut budgets: Vec<&Budget> = book.budgets.iter().collect();
        budgets.sort_by_key(|budget| budget.start_date);

        let mut cumulative = 0.0;
        budgets
            .into_iter()
            .map(|budget| {
                let totals = aggregate(budget, &book.items);
                let savings = totals.planned_savings(budget.total_income);
                cumulative += savings;
                SavingsTrendPoint {
                    budget_id: budget.id,
                    name: budget.name.clone(),
                    start_date: budget.start_date,
                    income: budget.total_income,
                    expenses: totals.total_forecasted,
                    savings,
                    cumulative,
                }
            })
            .collect()
    }
}

fn incomes(budgets: &[Budget]) -> Vec<f64> {
    budgets.iter().map(|budget| budget.total_income).collect()
}

fn actual_items(book: &BudgetBook) -> impl Iterator<Item = &LineItem> {
    book.items.iter().filter(|item| item.is_actual())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
