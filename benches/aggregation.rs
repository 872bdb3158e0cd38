use budgetbud::domain::{Budget, BudgetBook, Frequency, LineItem, LineItemKind};
use budgetbud::services::{aggregate, category_breakdown, resolve_period, SummaryService};
use budgetbud::storage::{load_book_from_path, save_book_to_path};
use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

const CATEGORIES: [&str; 6] = ["savings", "food", "utilities", "misc", "family", "travel"];

fn build_sample_book(budget_count: u32, items_per_budget: usize) -> BudgetBook {
    let mut book = BudgetBook::new("bench");
    for index in 1..=budget_count {
        let range = resolve_period(Frequency::Weekly, index, 2025).expect("week");
        let budget = Budget::new(
            "bench",
            format!("Week {index}"),
            Frequency::Weekly,
            index,
            range,
            2500.0,
            Utc::now(),
        );
        for idx in 0..items_per_budget {
            let kind = if idx % 3 == 0 {
                LineItemKind::Actual
            } else {
                LineItemKind::Forecasted
            };
            book.items.push(LineItem::new(
                "bench",
                budget.id,
                CATEGORIES[idx % CATEGORIES.len()],
                10.0 + (idx % 97) as f64 * 1.25,
                range.start_date + Duration::days((idx % 7) as i64),
                kind,
                Utc::now(),
            ));
        }
        book.budgets.push(budget);
    }
    book
}

fn bench_aggregation(c: &mut Criterion) {
    let book = build_sample_book(52, 200);
    let budget = &book.budgets[10];

    c.bench_function("aggregate_one_budget_10k_items", |b| {
        b.iter(|| black_box(aggregate(budget, black_box(&book.items))))
    });

    let totals = aggregate(budget, &book.items);
    c.bench_function("category_breakdown_10k_items", |b| {
        b.iter(|| black_box(category_breakdown(&book.items, totals.total_actual)))
    });

    c.bench_function("analytics_52_budgets", |b| {
        b.iter(|| black_box(SummaryService::analytics(&book, 5)))
    });
}

fn bench_book_io(c: &mut Criterion) {
    let book = build_sample_book(52, 50);
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bench.json");

    c.bench_function("book_save_2600_items", |b| {
        b.iter(|| save_book_to_path(&book, &path).expect("save book"))
    });

    save_book_to_path(&book, &path).expect("seed");
    c.bench_function("book_load_2600_items", |b| {
        b.iter(|| black_box(load_book_from_path(&path).expect("load book")))
    });
}

criterion_group!(benches, bench_aggregation, bench_book_io);
criterion_main!(benches);
