//! Controller that owns the current [`BudgetBook`] snapshot and keeps the
//! key-value store in step with it.

use std::thread;

use serde::de::DeserializeOwned;

use crate::core::book::BudgetBook;
use crate::core::services::{
    BudgetService, BudgetStatus, CategoryService, CategorySlice, MonthlyPoint, NewCategory,
    ServiceResult, SummaryService, Totals, TransactionService,
};
use crate::core::time::{Clock, SystemClock};
use crate::currency::CurrencyConverter;
use crate::domain::{Category, CategoryId, NewTransaction, Transaction, TransactionId};
use crate::errors::{BudgetError, Result};
use crate::storage::{KeyValueStore, StorageScope, CATEGORIES_KEY, TRANSACTIONS_KEY};

/// Outcome of reading both collections at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Keys that could not be read or parsed and were replaced by empty collections.
    pub failures: Vec<String>,
    pub warnings: Vec<String>,
}

/// Outcome of the last write of both collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub failures: Vec<String>,
}

impl SaveReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Facade that coordinates book state, persistence, and time.
pub struct BudgetManager {
    book: BudgetBook,
    storage: Box<dyn KeyValueStore>,
    scope: StorageScope,
    clock: Box<dyn Clock>,
    converter: CurrencyConverter,
    last_save: Option<SaveReport>,
}

impl BudgetManager {
    pub fn new(storage: Box<dyn KeyValueStore>, scope: StorageScope) -> Self {
        Self {
            book: BudgetBook::new(),
            storage,
            scope,
            clock: Box::new(SystemClock),
            converter: CurrencyConverter::default(),
            last_save: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_converter(mut self, converter: CurrencyConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Swaps the conversion factor used by every later aggregate.
    pub fn set_converter(&mut self, converter: CurrencyConverter) {
        self.converter = converter;
    }

    pub fn book(&self) -> &BudgetBook {
        &self.book
    }

    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    pub fn scope(&self) -> StorageScope {
        self.scope
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn last_save(&self) -> Option<&SaveReport> {
        self.last_save.as_ref()
    }

    /// Reads both collections concurrently and replaces the current book.
    /// Unreadable keys fall back to empty collections.
    pub fn load(&mut self) -> LoadReport {
        let storage = self.storage.as_ref();
        let scope = self.scope;
        let (transactions, categories) = thread::scope(|s| {
            let transactions =
                s.spawn(|| read_collection::<Transaction>(storage, TRANSACTIONS_KEY, scope));
            let categories =
                s.spawn(|| read_collection::<Category>(storage, CATEGORIES_KEY, scope));
            (join_worker(transactions.join()), join_worker(categories.join()))
        });

        let mut report = LoadReport::default();
        let transactions = settle_read(TRANSACTIONS_KEY, transactions, &mut report);
        let categories = settle_read(CATEGORIES_KEY, categories, &mut report);

        let (book, warnings) = BudgetBook::from_records(categories, transactions);
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        report.warnings = warnings;
        tracing::info!(
            transactions = book.transactions.len(),
            custom_categories = book.registry.custom().len(),
            %scope,
            "book loaded"
        );
        self.book = book;
        report
    }

    /// Writes both collections concurrently. Failures are logged and
    /// recorded; in-memory state stays authoritative.
    pub fn save(&mut self) -> &SaveReport {
        let storage = self.storage.as_ref();
        let scope = self.scope;
        let transactions = serde_json::to_string(self.book.transactions.as_slice());
        let categories = serde_json::to_string(&self.book.registry.to_records());

        let (tx_result, cat_result) = thread::scope(|s| {
            let tx = s.spawn(|| write_collection(storage, TRANSACTIONS_KEY, transactions, scope));
            let cat = s.spawn(|| write_collection(storage, CATEGORIES_KEY, categories, scope));
            (join_worker(tx.join()), join_worker(cat.join()))
        });

        let mut report = SaveReport::default();
        for (key, result) in [(TRANSACTIONS_KEY, tx_result), (CATEGORIES_KEY, cat_result)] {
            if let Err(err) = result {
                tracing::error!(key, "failed to save: {err}");
                report.failures.push(format!("{key}: {err}"));
            }
        }
        self.last_save.insert(report)
    }

    pub fn add_transaction(&mut self, draft: NewTransaction) -> Result<Transaction> {
        let now = self.clock.now();
        self.commit(|book| TransactionService::add(book, draft, now))
    }

    pub fn add_transaction_with_new_category(
        &mut self,
        draft: NewTransaction,
        category: NewCategory,
    ) -> Result<Transaction> {
        let now = self.clock.now();
        self.commit(|book| TransactionService::add_with_new_category(book, draft, category, now))
    }

    pub fn remove_transaction(&mut self, id: TransactionId) -> Result<Transaction> {
        self.commit(|book| TransactionService::remove(book, id))
    }

    pub fn add_main_category(&mut self, draft: NewCategory) -> Result<CategoryId> {
        self.commit(|book| CategoryService::add_main(book, draft))
    }

    pub fn add_subcategory(&mut self, parent: &CategoryId, name: &str) -> Result<CategoryId> {
        self.commit(|book| CategoryService::add_subcategory(book, parent, name))
    }

    pub fn remove_category(&mut self, id: &CategoryId) -> Result<Category> {
        self.commit(|book| CategoryService::remove(book, id))
    }

    pub fn set_limit(&mut self, id: &CategoryId, limit: f64) -> Result<()> {
        self.commit(|book| CategoryService::set_limit(book, id, limit))
    }

    pub fn clear_limit(&mut self, id: &CategoryId) -> Result<()> {
        self.commit(|book| CategoryService::clear_limit(book, id))
    }

    pub fn totals(&self) -> Totals {
        SummaryService::totals(&self.book, &self.converter)
    }

    pub fn monthly_series(&self) -> Vec<MonthlyPoint> {
        SummaryService::monthly_series(&self.book, &self.converter)
    }

    pub fn category_breakdown(&self) -> Vec<CategorySlice> {
        SummaryService::category_breakdown(&self.book, &self.converter)
    }

    pub fn current_month_category_spend(&self, main_category: &CategoryId) -> f64 {
        BudgetService::current_month_category_spend(
            &self.book,
            &self.converter,
            main_category,
            self.clock.today(),
        )
    }

    pub fn budget_control(&self) -> Vec<BudgetStatus> {
        BudgetService::budget_control(&self.book, &self.converter, self.clock.today())
    }

    /// Applies `change` to a copy of the book; the copy replaces the current
    /// snapshot only when the change succeeds.
    fn commit<T>(&mut self, change: impl FnOnce(&mut BudgetBook) -> ServiceResult<T>) -> Result<T> {
        let mut next = self.book.clone();
        let value = change(&mut next)?;
        self.book = next;
        self.save();
        Ok(value)
    }
}

fn read_collection<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
    scope: StorageScope,
) -> Result<Vec<T>> {
    match storage.get(key, scope)? {
        Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
        _ => Ok(Vec::new()),
    }
}

fn write_collection(
    storage: &dyn KeyValueStore,
    key: &str,
    serialized: serde_json::Result<String>,
    scope: StorageScope,
) -> Result<()> {
    let value = serialized?;
    storage.set(key, &value, scope)
}

fn settle_read<T>(key: &str, result: Result<Vec<T>>, report: &mut LoadReport) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(key, "starting with an empty collection: {err}");
            report.failures.push(format!("{key}: {err}"));
            Vec::new()
        }
    }
}

fn join_worker<T>(joined: thread::Result<Result<T>>) -> Result<T> {
    joined.unwrap_or_else(|_| Err(BudgetError::StorageError("storage worker panicked".into())))
}
