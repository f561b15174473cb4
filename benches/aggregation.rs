use std::hint::black_box;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use family_budget::core::services::{BudgetService, CategoryService, SummaryService, TransactionService};
use family_budget::core::BudgetBook;
use family_budget::currency::{Currency, CurrencyConverter};
use family_budget::domain::{CategoryId, EntryKind, NewTransaction};

const EXPENSE_CATEGORIES: [&str; 5] = ["comida", "salud", "auto", "luz", "entretenimiento"];

fn sample_book(size: usize) -> BudgetBook {
    let mut book = BudgetBook::new();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let recorded_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    for id in EXPENSE_CATEGORIES {
        CategoryService::set_limit(&mut book, &CategoryId::new(id), 50_000.0).unwrap();
    }
    for i in 0..size {
        let date = start + Duration::days((i % 540) as i64);
        let draft = if i % 10 == 0 {
            NewTransaction::new(EntryKind::Income, 900_000.0, Currency::ARS, "salario", date)
        } else {
            let currency = if i % 7 == 0 { Currency::USD } else { Currency::ARS };
            let category = EXPENSE_CATEGORIES[i % EXPENSE_CATEGORIES.len()];
            NewTransaction::new(EntryKind::Expense, 1_000.0 + i as f64, currency, category, date)
        };
        TransactionService::add(&mut book, draft, recorded_at).unwrap();
    }
    book
}

fn bench_aggregation(c: &mut Criterion) {
    let book = sample_book(10_000);
    let converter = CurrencyConverter::default();
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("aggregation.totals", |b| {
        b.iter(|| SummaryService::totals(black_box(&book), &converter));
    });
    c.bench_function("aggregation.monthly_series", |b| {
        b.iter(|| SummaryService::monthly_series(black_box(&book), &converter));
    });
    c.bench_function("aggregation.category_breakdown", |b| {
        b.iter(|| SummaryService::category_breakdown(black_box(&book), &converter));
    });
    c.bench_function("aggregation.budget_control", |b| {
        b.iter(|| BudgetService::budget_control(black_box(&book), &converter, today));
    });
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
