//! The persisted sub-state and the stores that read and write it.
//!
//! Only [`PersistedState`] is ever written. Run state (status, active
//! index, countdown) has no serialized form, so a restarted process always
//! begins idle.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::data_dir;
use crate::error::StorageError;
use crate::task::Task;
use crate::timer::RepeatMode;

const STATE_FILE: &str = "state.json";

/// Tasks and the repeat preference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub repeat_mode: RepeatMode,
}

/// Where the persisted state lives.
pub trait StateStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedState>, StorageError>;
    fn save(&self, state: &PersistedState) -> Result<(), StorageError>;
}

/// JSON file store, `~/.config/todotimer/state.json` by default.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the default data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::new(data_dir()?.join(STATE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        let state = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), "loaded state");
        Ok(Some(state))
    }

    /// Write via a sibling temp file and rename so a crash never leaves a
    /// truncated state file behind.
    fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| StorageError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        debug!(path = %self.path.display(), tasks = state.tasks.len(), "saved state");
        Ok(())
    }
}

/// In-memory store for tests. Counts saves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RefCell<Option<PersistedState>>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: RefCell::new(Some(state)),
            saves: RefCell::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        *self.state.borrow_mut() = Some(state.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
