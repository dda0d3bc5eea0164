//! # Session Setup
//!
//! Resolves where configuration lives and builds the session API.
//!
//! ## Config Directory Resolution
//!
//! 1. `SHELF_HOME` environment variable, when set and non-empty.
//! 2. Otherwise the OS-appropriate config directory (via the `directories`
//!    crate), e.g. `~/.config/shelf` on Linux.
//! 3. If neither is available, `./.shelf`.
//!
//! ## Seed Resolution
//!
//! An explicit seed path (the CLI's `--seed`) wins over the `seed` config key;
//! with neither, the built-in catalog is used.

use crate::api::ShelfApi;
use crate::config::ShelfConfig;
use crate::error::Result;
use crate::seed;
use crate::store::memory::InMemoryStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "SHELF_HOME";

pub struct ShelfContext {
    pub api: ShelfApi<InMemoryStore>,
}

pub fn config_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    ProjectDirs::from("com", "shelf", "shelf")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".shelf"))
}

/// Loads configuration from `config_dir` and seeds a fresh session.
pub fn initialize(config_dir: PathBuf, seed_override: Option<&Path>) -> Result<ShelfContext> {
    let config = ShelfConfig::load(&config_dir)?;
    let seed_path = seed_override.or(config.seed.as_deref());
    let store = seed::load(seed_path)?;

    Ok(ShelfContext {
        api: ShelfApi::new(store, config_dir, config),
    })
}
