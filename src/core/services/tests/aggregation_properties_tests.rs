use chrono::{NaiveDate, Utc};

use crate::core::book::BudgetBook;
use crate::core::services::{BudgetService, CategoryService, SummaryService, TransactionService};
use crate::currency::{Currency, CurrencyConverter};
use crate::domain::{CategoryId, EntryKind, NewTransaction};

#[test]
fn balance_is_income_minus_expense() {
    let book = sample_book();
    let totals = SummaryService::totals(&book, &CurrencyConverter::default());
    assert_eq!(totals.balance, totals.total_income - totals.total_expense);
    assert_eq!(totals.total_income, 2_000_000.0 + 300.0);
    assert_eq!(totals.total_expense, 100.0 + 50_000.0 + 4_500.0);
}

#[test]
fn append_then_remove_restores_every_aggregate() {
    let mut book = sample_book();
    let converter = CurrencyConverter::default();
    let today = date(2024, 6, 20);
    let before = snapshot(&book, &converter, today);

    let draft = NewTransaction::new(EntryKind::Expense, 999.0, Currency::USD, "comida", today);
    let txn = TransactionService::add(&mut book, draft, Utc::now()).unwrap();
    assert_ne!(snapshot(&book, &converter, today), before);

    TransactionService::remove(&mut book, txn.id).unwrap();
    assert_eq!(snapshot(&book, &converter, today), before);
}

#[test]
fn budget_percentage_stays_within_bounds() {
    let book = sample_book();
    let control = BudgetService::budget_control(&book, &CurrencyConverter::default(), date(2024, 6, 30));
    assert!(!control.is_empty());
    for status in control {
        assert!((0.0..=100.0).contains(&status.percentage), "{status:?}");
    }
}

type Snapshot = (String, String, String, String);

fn snapshot(book: &BudgetBook, converter: &CurrencyConverter, today: NaiveDate) -> Snapshot {
    (
        format!("{:?}", SummaryService::totals(book, converter)),
        format!("{:?}", SummaryService::monthly_series(book, converter)),
        format!("{:?}", SummaryService::category_breakdown(book, converter)),
        format!("{:?}", BudgetService::budget_control(book, converter, today)),
    )
}

fn sample_book() -> BudgetBook {
    let mut book = BudgetBook::new();
    CategoryService::set_limit(&mut book, &CategoryId::new("comida"), 10_000.0).unwrap();
    CategoryService::set_limit(&mut book, &CategoryId::new("auto"), 1_000.0).unwrap();
    let entries = [
        (EntryKind::Income, 2_000.0, Currency::USD, "salario", date(2024, 5, 1)),
        (EntryKind::Income, 300.0, Currency::ARS, "freelance", date(2024, 6, 2)),
        (EntryKind::Expense, 100.0, Currency::ARS, "comida", date(2024, 6, 3)),
        (EntryKind::Expense, 50.0, Currency::USD, "comida", date(2024, 6, 4)),
        (EntryKind::Expense, 4_500.0, Currency::ARS, "auto", date(2024, 6, 5)),
    ];
    for (kind, amount, currency, category, on) in entries {
        let draft = NewTransaction::new(kind, amount, currency, category, on);
        TransactionService::add(&mut book, draft, Utc::now()).unwrap();
    }
    book
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
