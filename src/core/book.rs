//! Snapshot of everything the household has recorded.

use crate::core::registry::CategoryRegistry;
use crate::core::store::TransactionStore;
use crate::domain::{Category, Transaction};

/// Application state: categories plus transactions. Queries borrow it,
/// mutations go through the services on a clone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetBook {
    pub registry: CategoryRegistry,
    pub transactions: TransactionStore,
}

impl BudgetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a book from the two persisted collections.
    pub fn from_records(
        categories: Vec<Category>,
        transactions: Vec<Transaction>,
    ) -> (Self, Vec<String>) {
        let (registry, mut warnings) = CategoryRegistry::from_records(categories);
        let mut transactions = transactions;
        for txn in &mut transactions {
            if !registry.contains(&txn.category) {
                continue;
            }
            let main = registry.main_category_of(&txn.category);
            if txn.main_category != main {
                warnings.push(format!(
                    "transaction {} main category realigned from {} to {}",
                    txn.id, txn.main_category, main
                ));
                txn.main_category = main;
            }
        }
        let book = Self {
            registry,
            transactions: TransactionStore::from_records(transactions),
        };
        warnings.extend(book.warnings());
        (book, warnings)
    }

    /// Dangling category references left behind by external edits.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for txn in self.transactions.iter() {
            if !self.registry.contains(&txn.category) {
                warnings.push(format!(
                    "transaction {} references missing category {}",
                    txn.id, txn.category
                ));
            }
            if txn.main_category != txn.category && !self.registry.contains(&txn.main_category) {
                warnings.push(format!(
                    "transaction {} references missing main category {}",
                    txn.id, txn.main_category
                ));
            }
        }
        warnings
    }
}
