//! Append/remove-only transaction collection.

use crate::domain::{CategoryId, Transaction, TransactionId};
use crate::errors::{BudgetError, Result};

/// Transactions in insertion order, which is also chronological order of
/// recording. Display order is the reverse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn append(&mut self, transaction: Transaction) -> TransactionId {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    /// Removes every transaction carrying `id` and returns the first of
    /// them. Legacy numeric ids can collide.
    pub fn remove(&mut self, id: TransactionId) -> Result<Transaction> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| BudgetError::TransactionNotFound(id.to_string()))?;
        self.transactions.retain(|txn| txn.id != id);
        Ok(removed)
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Transaction> + '_ {
        self.transactions.iter()
    }

    /// Newest first, the order lists are shown in.
    pub fn recent_first(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions.iter().rev()
    }

    pub fn references(&self, category: &CategoryId) -> bool {
        self.transactions.iter().any(|txn| txn.references(category))
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
