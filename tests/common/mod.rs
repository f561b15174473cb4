#![allow(dead_code)]

use std::path::Path;

use chrono::NaiveDate;
use family_budget::{
    core::{BudgetManager, FixedClock},
    currency::Currency,
    domain::{EntryKind, NewTransaction},
    storage::{JsonFileStore, StorageScope},
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Manager over a JSON store rooted at `base`, pinned to `today`.
pub fn file_manager(base: &Path, today: NaiveDate) -> BudgetManager {
    let store =
        JsonFileStore::new(Some(base.to_path_buf()), Some(3)).expect("create json store");
    BudgetManager::new(Box::new(store), StorageScope::Shared).with_clock(FixedClock::new(today))
}

pub fn expense(amount: f64, currency: Currency, category: &str, on: NaiveDate) -> NewTransaction {
    NewTransaction::new(EntryKind::Expense, amount, currency, category, on)
}

pub fn income(amount: f64, category: &str, on: NaiveDate) -> NewTransaction {
    NewTransaction::new(EntryKind::Income, amount, Currency::ARS, category, on)
}
