use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_file_atomic, PathResolver},
    errors::ConfigError,
};

/// Categories offered to pickers before the user has created any.
pub const DEFAULT_SEED_CATEGORIES: [&str; 5] =
    ["Food", "Transport", "Entertainment", "Shopping", "Other"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the persisted collections; `None` uses the default layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub seed_categories: Vec<String>,
    pub budget_policy: BudgetPolicy,
    /// `tracing` filter directive, e.g. `spend_ledger=debug`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed_categories: DEFAULT_SEED_CATEGORIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            budget_policy: BudgetPolicy::default(),
            log_filter: None,
        }
    }
}

/// Knobs for the category lifecycle gaps between budgets and history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetPolicy {
    /// When set, a new budget starts with `spent` summed from existing
    /// transactions in its category instead of zero.
    pub backfill_spent_on_create: bool,
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_file_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
