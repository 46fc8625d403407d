//! Persistence: the key/value "local storage" seam, its SQLite and
//! in-memory backends, and the TOML configuration file.

mod config;
pub mod database;
pub mod memory;

pub use config::{Config, NotificationsConfig, UiConfig, WatchConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// String key/value storage with browser local-storage semantics.
///
/// Values are opaque strings; callers serialize whole documents into a
/// single key and rewrite it on every change.
pub trait LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<T: LocalStore + ?Sized> LocalStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `STUDYVERSE_DATA_DIR` wins when set. Otherwise `~/.config/studyverse`,
/// or `~/.config/studyverse-dev` with `STUDYVERSE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STUDYVERSE_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYVERSE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studyverse-dev")
            } else {
                base_dir.join("studyverse")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
