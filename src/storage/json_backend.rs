use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;

use crate::core::utils::{ensure_dir, write_atomic, PathResolver};
use crate::errors::{BudgetError, Result};

use super::{KeyValueStore, StorageScope};

const VALUE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const DEFAULT_RETENTION: usize = 5;

/// File-backed store: one JSON document per key and scope, written
/// atomically, with the previous version rotated into a backup directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonFileStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        let data_dir = PathResolver::data_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&data_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            data_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn value_path(&self, key: &str, scope: StorageScope) -> PathBuf {
        self.data_dir
            .join(scope.as_str())
            .join(format!("{}.{}", canonical_key(key), VALUE_EXTENSION))
    }

    fn backup_dir(&self, key: &str, scope: StorageScope) -> PathBuf {
        self.backups_dir
            .join(scope.as_str())
            .join(canonical_key(key))
    }

    /// Backup file names for `key`, newest first.
    pub fn list_backups(&self, key: &str, scope: StorageScope) -> Result<Vec<String>> {
        let dir = self.backup_dir(key, scope);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        // Fixed-width timestamps sort lexicographically.
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }

    pub fn backup_path(&self, key: &str, scope: StorageScope, backup_name: &str) -> PathBuf {
        self.backup_dir(key, scope).join(backup_name)
    }

    /// Reads a backup without restoring it.
    pub fn read_backup(&self, key: &str, scope: StorageScope, backup_name: &str) -> Result<String> {
        let path = self.backup_path(key, scope, backup_name);
        if !path.exists() {
            return Err(BudgetError::StorageError(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn backup_existing_file(&self, key: &str, scope: StorageScope, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(key, scope);
        ensure_dir(&dir)?;
        let stem = format!(
            "{}_{}",
            canonical_key(key),
            Utc::now().format(BACKUP_TIMESTAMP_FORMAT)
        );
        let mut target = dir.join(format!("{stem}.{VALUE_EXTENSION}"));
        let mut attempt = 1;
        while target.exists() {
            target = dir.join(format!("{stem}_{attempt}.{VALUE_EXTENSION}"));
            attempt += 1;
        }
        fs::copy(path, &target)?;
        self.prune_backups(key, scope)
    }

    fn prune_backups(&self, key: &str, scope: StorageScope) -> Result<()> {
        let backups = self.list_backups(key, scope)?;
        for stale in backups.iter().skip(self.retention) {
            let path = self.backup_path(key, scope, stale);
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), "failed to prune backup: {err}");
            }
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str, scope: StorageScope) -> Result<Option<String>> {
        let path = self.value_path(key, scope);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str, scope: StorageScope) -> Result<()> {
        let path = self.value_path(key, scope);
        self.backup_existing_file(key, scope, &path)?;
        write_atomic(&path, value)?;
        tracing::debug!(key, %scope, bytes = value.len(), "value stored");
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "value".into()
    } else {
        sanitized
    }
}
