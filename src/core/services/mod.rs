pub mod budget_service;
pub mod category_service;
pub mod summary_service;
pub mod transaction_service;

pub use budget_service::{BudgetService, BudgetStatus};
pub use category_service::{CategoryService, NewCategory};
pub use summary_service::{CategorySlice, MonthlyPoint, SummaryService, Totals};
pub use transaction_service::TransactionService;

use crate::errors::BudgetError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("{0}")]
    Invalid(String),
}

impl From<ServiceError> for BudgetError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(inner) => inner,
            ServiceError::Invalid(message) => BudgetError::InvalidInput(message),
        }
    }
}

#[cfg(test)]
mod tests;
