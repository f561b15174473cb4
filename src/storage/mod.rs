//! Key-value persistence. The book is stored as two independent JSON
//! documents, one per key.

pub mod json_backend;
pub mod memory;

use std::fmt;

use crate::errors::Result;

/// Key holding the JSON array of transaction records.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key holding the JSON array of custom (and overridden built-in) category records.
pub const CATEGORIES_KEY: &str = "custom-categories";

/// Visibility of a stored value: shared with the household or personal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageScope {
    #[default]
    Shared,
    Personal,
}

impl StorageScope {
    pub fn from_shared(shared: bool) -> Self {
        if shared {
            StorageScope::Shared
        } else {
            StorageScope::Personal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageScope::Shared => "shared",
            StorageScope::Personal => "personal",
        }
    }
}

impl fmt::Display for StorageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstraction over the external key-value service. Reads of a missing key
/// return `Ok(None)`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str, scope: StorageScope) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str, scope: StorageScope) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
