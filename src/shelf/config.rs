use crate::error::{Result, ShelfError};
use crate::model::Condition;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_BORROWER: &str = "Current User";

/// Configuration for shelf, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelfConfig {
    /// Identity recorded on borrow records
    #[serde(default = "default_borrower")]
    pub borrower: String,

    /// Condition recorded at checkout when none is given
    #[serde(default)]
    pub condition: Condition,

    /// Alternative seed catalog (JSON). The built-in catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<PathBuf>,
}

fn default_borrower() -> String {
    DEFAULT_BORROWER.to_string()
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            borrower: default_borrower(),
            condition: Condition::default(),
            seed: None,
        }
    }
}

impl ShelfConfig {
    pub const KEYS: &'static [&'static str] = &["borrower", "condition", "seed"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ShelfConfig = serde_json::from_str(&content)?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "borrower" => Some(self.borrower.clone()),
            "condition" => Some(self.condition.to_string()),
            "seed" => Some(
                self.seed
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(built-in)".to_string()),
            ),
            _ => None,
        }
    }

    /// Sets a key from its string form. An empty seed value resets to the
    /// built-in catalog.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "borrower" => {
                let borrower = value.trim();
                if borrower.is_empty() {
                    return Err(ShelfError::Config("borrower cannot be empty".into()));
                }
                self.borrower = borrower.to_string();
            }
            "condition" => {
                self.condition = value.parse().map_err(ShelfError::Config)?;
            }
            "seed" => {
                let value = value.trim();
                self.seed = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => {
                return Err(ShelfError::Config(format!("Unknown config key: {}", other)));
            }
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        Self::KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (*k, v)))
            .collect()
    }
}
