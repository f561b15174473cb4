pub mod category;
pub mod common;
pub mod transaction;

pub use category::{Category, CategoryIcon, CategoryId};
pub use common::{Displayable, EntryKind, NamedEntity};
pub use transaction::{NewTransaction, Transaction, TransactionId, YearMonth};
