//! Monthly spend per main category and the budget-control snapshot.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::book::BudgetBook;
use crate::currency::CurrencyConverter;
use crate::domain::{Category, CategoryId, EntryKind, YearMonth};

/// Current-month usage of one limited expense category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: Category,
    pub limit: f64,
    pub spent: f64,
    /// Negative once the limit is exceeded.
    pub remaining: f64,
    /// `spent / limit * 100`, capped at 100.
    pub percentage: f64,
    pub over_budget: bool,
}

/// Stateless budgeting utilities that operate over [`BudgetBook`] snapshots.
pub struct BudgetService;

impl BudgetService {
    /// Normalized expense total of `main_category` within `month`.
    pub fn month_category_spend(
        book: &BudgetBook,
        converter: &CurrencyConverter,
        main_category: &CategoryId,
        month: YearMonth,
    ) -> f64 {
        book.transactions
            .iter()
            .filter(|txn| {
                txn.kind == EntryKind::Expense
                    && txn.month() == month
                    && &txn.main_category == main_category
            })
            .map(|txn| converter.normalize(txn.amount, txn.currency))
            .sum()
    }

    /// Spend of `main_category` in the month containing `today`.
    pub fn current_month_category_spend(
        book: &BudgetBook,
        converter: &CurrencyConverter,
        main_category: &CategoryId,
        today: NaiveDate,
    ) -> f64 {
        Self::month_category_spend(book, converter, main_category, YearMonth::of(today))
    }

    /// Usage of every expense main category with a positive limit during the
    /// month containing `today`, ordered by ascending percentage.
    pub fn budget_control(
        book: &BudgetBook,
        converter: &CurrencyConverter,
        today: NaiveDate,
    ) -> Vec<BudgetStatus> {
        let month = YearMonth::of(today);
        let mut statuses: Vec<BudgetStatus> = book
            .registry
            .main_categories(EntryKind::Expense)
            .into_iter()
            .filter_map(|category| {
                let limit = book.registry.limit_for(&category.id)?;
                if limit <= 0.0 {
                    return None;
                }
                let spent = Self::month_category_spend(book, converter, &category.id, month);
                Some(BudgetStatus {
                    limit,
                    spent,
                    remaining: limit - spent,
                    percentage: (spent / limit * 100.0).clamp(0.0, 100.0),
                    over_budget: spent > limit,
                    category,
                })
            })
            .collect();
        // Stable: ties keep registry order.
        statuses.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{CategoryService, TransactionService};
    use crate::currency::Currency;
    use crate::domain::NewTransaction;
    use chrono::Utc;

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn spend(book: &mut BudgetBook, amount: f64, currency: Currency, category: &str, date: NaiveDate) {
        let draft = NewTransaction::new(EntryKind::Expense, amount, currency, category, date);
        TransactionService::add(book, draft, Utc::now()).unwrap();
    }

    #[test]
    fn usd_spend_is_converted_before_summing() {
        let mut book = BudgetBook::new();
        spend(&mut book, 100.0, Currency::ARS, "comida", may(3));
        spend(&mut book, 50.0, Currency::USD, "comida", may(4));
        spend(&mut book, 70.0, Currency::ARS, "comida", NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());

        let spent = BudgetService::current_month_category_spend(
            &book,
            &CurrencyConverter::new(1000.0),
            &CategoryId::new("comida"),
            may(20),
        );
        assert_eq!(spent, 50_100.0);
    }

    #[test]
    fn overspent_category_caps_percentage_and_goes_negative() {
        let mut book = BudgetBook::new();
        let comida = CategoryId::new("comida");
        CategoryService::set_limit(&mut book, &comida, 1000.0).unwrap();
        spend(&mut book, 1100.0, Currency::ARS, "comida", may(2));

        let control = BudgetService::budget_control(&book, &CurrencyConverter::default(), may(15));
        assert_eq!(control.len(), 1);
        let status = &control[0];
        assert_eq!(status.percentage, 100.0);
        assert_eq!(status.remaining, -100.0);
        assert!(status.over_budget);
    }

    #[test]
    fn categories_without_positive_limit_are_excluded() {
        let mut book = BudgetBook::new();
        CategoryService::set_limit(&mut book, &CategoryId::new("luz"), 0.0).unwrap();
        let control = BudgetService::budget_control(&book, &CurrencyConverter::default(), may(1));
        assert!(control.is_empty());
    }

    #[test]
    fn snapshot_is_sorted_by_ascending_percentage() {
        let mut book = BudgetBook::new();
        for (id, limit) in [("comida", 100.0), ("salud", 100.0), ("auto", 100.0)] {
            CategoryService::set_limit(&mut book, &CategoryId::new(id), limit).unwrap();
        }
        spend(&mut book, 80.0, Currency::ARS, "comida", may(1));
        spend(&mut book, 10.0, Currency::ARS, "salud", may(1));
        spend(&mut book, 40.0, Currency::ARS, "auto", may(1));

        let control = BudgetService::budget_control(&book, &CurrencyConverter::default(), may(9));
        let order: Vec<&str> = control.iter().map(|s| s.category.id.as_str()).collect();
        assert_eq!(order, vec!["salud", "auto", "comida"]);
    }
}
