use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::models::Money;
use crate::summary::AlertThresholds;

pub const ENV_DB: &str = "BUDGETBUDDY_DB";
pub const ENV_DAILY_LIMIT: &str = "BUDGETBUDDY_DAILY_LIMIT";
pub const ENV_LOW_REMAINING: &str = "BUDGETBUDDY_LOW_REMAINING";
pub const ENV_ALLOW_REBUILD: &str = "BUDGETBUDDY_ALLOW_REBUILD";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub thresholds: AlertThresholds,
    /// Drop and recreate an incompatible database instead of refusing to open it
    pub allow_destructive_rebuild: bool,
}

impl Config {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            thresholds: AlertThresholds::default(),
            allow_destructive_rebuild: true,
        }
    }

    /// Defaults with `BUDGETBUDDY_*` environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match lookup(ENV_DB) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(shellexpand(path.trim())),
            _ => default_db_path()?,
        };
        let mut config = Self::new(db_path);

        if let Some(raw) = lookup(ENV_DAILY_LIMIT) {
            config.thresholds.daily_limit = parse_money(ENV_DAILY_LIMIT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOW_REMAINING) {
            config.thresholds.low_remaining = parse_money(ENV_LOW_REMAINING, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ALLOW_REBUILD) {
            config.allow_destructive_rebuild = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(StoreError::Config(format!(
                        "{ENV_ALLOW_REBUILD} must be true or false, got '{other}'"
                    )))
                }
            };
        }
        Ok(config)
    }
}

fn parse_money(key: &str, raw: &str) -> Result<Money> {
    Money::parse(raw).map_err(|_| StoreError::Config(format!("{key} is not an amount: '{raw}'")))
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budgetbuddy", "BudgetBuddy")
        .ok_or_else(|| StoreError::Config("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().join("budgetbuddy.db"))
}

pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
