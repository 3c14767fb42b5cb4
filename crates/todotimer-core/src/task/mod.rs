//! Task types and the ordered task list.
//!
//! A task is addressed by its [`TaskId`] everywhere; list position is
//! only ever used for ordering and for the timer's active index.

mod form;
mod list;

pub use form::{parse_duration, validate_duration, validate_name};
pub use list::TaskList;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque task identifier, immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A named, timed entry in the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Duration in whole minutes.
    pub duration: u32,
}

impl Task {
    /// Get task duration in seconds.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration) * 60
    }
}

/// Partial update for [`TaskList::update`]. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl TaskUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            duration: None,
        }
    }

    pub fn duration(duration: u32) -> Self {
        Self {
            name: None,
            duration: Some(duration),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.duration.is_none()
    }
}
