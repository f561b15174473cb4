use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::{BudgetError, Result};

use super::{KeyValueStore, StorageScope};

/// In-process store for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<(StorageScope, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: &str, value: &str, scope: StorageScope) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert((scope, key.to_string()), value.to_string());
        }
        self
    }

    fn values(&self) -> Result<MutexGuard<'_, HashMap<(StorageScope, String), String>>> {
        self.values
            .lock()
            .map_err(|_| BudgetError::StorageError("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str, scope: StorageScope) -> Result<Option<String>> {
        Ok(self.values()?.get(&(scope, key.to_string())).cloned())
    }

    fn set(&self, key: &str, value: &str, scope: StorageScope) -> Result<()> {
        self.values()?
            .insert((scope, key.to_string()), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let store = MemoryStore::new();
        store.set("k", "v", StorageScope::Personal).unwrap();
        assert_eq!(store.get("k", StorageScope::Personal).unwrap().as_deref(), Some("v"));
        assert_eq!(store.get("k", StorageScope::Shared).unwrap(), None);
    }
}
