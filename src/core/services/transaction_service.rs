//! Business logic helpers for recording transactions.

use chrono::{DateTime, Utc};

use crate::core::book::BudgetBook;
use crate::core::services::{CategoryService, NewCategory, ServiceError, ServiceResult};
use crate::domain::{Displayable, NewTransaction, Transaction, TransactionId};
use crate::errors::BudgetError;

/// Validated append/remove helpers for the transaction store.
pub struct TransactionService;

impl TransactionService {
    /// Records a transaction, deriving its main category from the registry.
    pub fn add(
        book: &mut BudgetBook,
        draft: NewTransaction,
        recorded_at: DateTime<Utc>,
    ) -> ServiceResult<Transaction> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "Amount must be a positive number".into(),
            ));
        }
        if !book.registry.contains(&draft.category) {
            return Err(BudgetError::CategoryNotFound(draft.category.to_string()).into());
        }
        let main_category = book.registry.main_category_of(&draft.category);
        let transaction = Transaction::record(draft, main_category, recorded_at);
        book.transactions.append(transaction.clone());
        tracing::info!(
            transaction = %transaction.id,
            kind = %transaction.kind,
            amount = transaction.amount,
            currency = %transaction.currency,
            "transaction recorded"
        );
        Ok(transaction)
    }

    /// Creates a main category of the transaction's type and records the
    /// transaction against it. `draft.category` is replaced.
    pub fn add_with_new_category(
        book: &mut BudgetBook,
        mut draft: NewTransaction,
        category: NewCategory,
        recorded_at: DateTime<Utc>,
    ) -> ServiceResult<Transaction> {
        let category = NewCategory {
            kind: draft.kind,
            ..category
        };
        draft.category = CategoryService::add_main(book, category)?;
        Self::add(book, draft, recorded_at)
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(book: &mut BudgetBook, id: TransactionId) -> ServiceResult<Transaction> {
        let removed = book.transactions.remove(id)?;
        tracing::info!(transaction = %id, "removed {}", removed.display_label());
        Ok(removed)
    }

    /// Returns the transactions newest first.
    pub fn list(book: &BudgetBook) -> Vec<&Transaction> {
        book.transactions.recent_first().collect()
    }
}
