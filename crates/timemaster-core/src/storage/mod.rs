mod config;
pub mod database;
mod kv;
mod settings;

pub use config::{AudioConfig, Config, EngineTiming, LogConfig};
pub use database::Database;
pub use kv::{KeyValueStore, MemoryStore};
pub use settings::{Settings, SettingsStore, Theme};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `TIMEMASTER_DATA_DIR` overrides the location outright. Otherwise it is
/// `~/.config/timemaster[-dev]/`, with `TIMEMASTER_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TIMEMASTER_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TIMEMASTER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("timemaster-dev")
            } else {
                base_dir.join("timemaster")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
