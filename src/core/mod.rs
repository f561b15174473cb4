pub mod book;
pub mod budget_manager;
pub mod defaults;
pub mod registry;
pub mod services;
pub mod store;
pub mod time;
pub mod utils;

pub use book::BudgetBook;
pub use budget_manager::{BudgetManager, LoadReport, SaveReport};
pub use registry::{CategoryOverride, CategoryRegistry};
pub use store::TransactionStore;
pub use time::{Clock, FixedClock, SystemClock};
