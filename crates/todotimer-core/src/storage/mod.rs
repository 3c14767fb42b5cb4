//! Persistence: the persisted sub-state, stores, write debouncing and
//! the TOML configuration.

mod autosave;
mod config;
mod debounce;
mod state;

pub use autosave::AutoSave;
pub use config::{Config, DefaultsConfig, PersistenceConfig, SoundConfig, WindowConfig};
pub use debounce::Debouncer;
pub use state::{JsonFileStore, MemoryStore, PersistedState, StateStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/todotimer[-dev]/` based on TODOTIMER_ENV.
///
/// Set TODOTIMER_ENV=dev to use development data directory.
/// TODOTIMER_HOME overrides the location entirely.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("TODOTIMER_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .ok_or(StorageError::NoDataDir)?
                .join(".config");
            let env = std::env::var("TODOTIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("todotimer-dev")
            } else {
                base_dir.join("todotimer")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
    Ok(dir)
}
