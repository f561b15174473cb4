//! Aggregates over the whole transaction history: totals, the monthly
//! trend, and the expense breakdown per main category.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::core::book::BudgetBook;
use crate::currency::CurrencyConverter;
use crate::domain::{CategoryId, EntryKind, YearMonth};

/// Number of most recent months kept in the monthly series.
pub const MONTHLY_SERIES_WINDOW: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: YearMonth,
    pub income: f64,
    pub expense: f64,
}

/// One slice of the expense pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category_id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_image: bool,
    pub value: f64,
    /// Fraction of all expenses, in `0.0..=1.0`.
    pub share: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(book: &BudgetBook, converter: &CurrencyConverter) -> Totals {
        let (total_income, total_expense) =
            book.transactions
                .iter()
                .fold((0.0, 0.0), |(income, expense), txn| {
                    let amount = converter.normalize(txn.amount, txn.currency);
                    match txn.kind {
                        EntryKind::Income => (income + amount, expense),
                        EntryKind::Expense => (income, expense + amount),
                    }
                });
        Totals {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }

    /// Income and expense per month, oldest first, limited to the most
    /// recent [`MONTHLY_SERIES_WINDOW`] months that have activity.
    pub fn monthly_series(book: &BudgetBook, converter: &CurrencyConverter) -> Vec<MonthlyPoint> {
        let mut by_month: BTreeMap<YearMonth, MonthlyPoint> = BTreeMap::new();
        for txn in book.transactions.iter() {
            let month = txn.month();
            let point = by_month.entry(month).or_insert(MonthlyPoint {
                month,
                income: 0.0,
                expense: 0.0,
            });
            let amount = converter.normalize(txn.amount, txn.currency);
            match txn.kind {
                EntryKind::Income => point.income += amount,
                EntryKind::Expense => point.expense += amount,
            }
        }
        let points: Vec<MonthlyPoint> = by_month.into_values().collect();
        let skip = points.len().saturating_sub(MONTHLY_SERIES_WINDOW);
        points.into_iter().skip(skip).collect()
    }

    /// Expense totals per main category, largest first.
    pub fn category_breakdown(
        book: &BudgetBook,
        converter: &CurrencyConverter,
    ) -> Vec<CategorySlice> {
        let mut order: Vec<CategoryId> = Vec::new();
        let mut sums: HashMap<CategoryId, f64> = HashMap::new();
        for txn in book
            .transactions
            .iter()
            .filter(|txn| txn.kind == EntryKind::Expense)
        {
            let amount = converter.normalize(txn.amount, txn.currency);
            let entry = sums.entry(txn.main_category.clone()).or_insert_with(|| {
                order.push(txn.main_category.clone());
                0.0
            });
            *entry += amount;
        }

        let total: f64 = sums.values().sum();
        let mut slices: Vec<CategorySlice> = order
            .into_iter()
            .map(|id| {
                let value = sums.get(&id).copied().unwrap_or_default();
                let category = book.registry.lookup(&id);
                CategorySlice {
                    category_id: id,
                    name: category.name,
                    icon: category.icon,
                    color: category.color,
                    is_image: category.is_image,
                    value,
                    share: if total > 0.0 { value / total } else { 0.0 },
                }
            })
            .collect();
        slices.sort_by(|a, b| b.value.total_cmp(&a.value));
        slices
    }
}
