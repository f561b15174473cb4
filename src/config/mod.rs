use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::utils::{ensure_dir, write_atomic, PathResolver};
use crate::currency::{CurrencyConverter, DEFAULT_USD_TO_ARS_RATE};
use crate::errors::{BudgetError, Result};
use crate::storage::StorageScope;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Pesos per dollar used by every aggregate.
    pub usd_to_ars_rate: f64,
    /// Store data in the household-shared scope instead of the personal one.
    pub shared_storage: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            usd_to_ars_rate: DEFAULT_USD_TO_ARS_RATE,
            shared_storage: true,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn converter(&self) -> CurrencyConverter {
        CurrencyConverter::new(self.usd_to_ars_rate)
    }

    pub fn scope(&self) -> StorageScope {
        StorageScope::from_shared(self.shared_storage)
    }

    /// Applies a `key value` pair coming from the CLI.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "usd_to_ars_rate" | "usd-rate" => {
                let rate: f64 = value.trim().parse().map_err(|_| {
                    BudgetError::ConfigError(format!("`{value}` is not a number"))
                })?;
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(BudgetError::ConfigError(
                        "usd rate must be a positive number".into(),
                    ));
                }
                self.usd_to_ars_rate = rate;
            }
            "shared_storage" | "shared" => {
                self.shared_storage = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => {
                        return Err(BudgetError::ConfigError(format!(
                            "`{other}` is not a boolean"
                        )))
                    }
                };
            }
            "data_dir" => {
                self.data_dir = if value.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value.trim()))
                };
            }
            other => {
                return Err(BudgetError::ConfigError(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }
        Ok(())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            BudgetError::ConfigError(format!("{}: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    /// Directory holding the book data: the configured override or the base dir.
    pub fn data_root(&self, config: &Config) -> PathBuf {
        config.data_dir.clone().unwrap_or_else(|| self.base.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
