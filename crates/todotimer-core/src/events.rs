use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};
use crate::timer::{RepeatMode, RunStatus};

/// Every state change in the system produces an Event.
/// Front ends render from snapshots; collaborators (sound, persistence)
/// subscribe to events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task: Task,
        index: usize,
        at: DateTime<Utc>,
    },
    TaskUpdated {
        task: Task,
        at: DateTime<Utc>,
    },
    TaskRemoved {
        id: TaskId,
        index: usize,
        at: DateTime<Utc>,
    },
    TasksReordered {
        from: usize,
        to: usize,
        at: DateTime<Utc>,
    },
    TasksCleared {
        at: DateTime<Utc>,
    },
    TimerStarted {
        index: usize,
        task_id: TaskId,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        reason: StopReason,
        at: DateTime<Utc>,
    },
    /// The active task ended, either by running out or by a manual skip.
    /// Sound collaborators react to this one.
    TaskCompleted {
        index: usize,
        task_id: TaskId,
        kind: CompletionKind,
        at: DateTime<Utc>,
    },
    /// The engine moved on to the next task (possibly the same one under
    /// repeat-current).
    TaskAdvanced {
        from_index: usize,
        to_index: usize,
        task_id: TaskId,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerSeeked {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    RepeatModeChanged {
        mode: RepeatMode,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event changes the persisted part of the state.
    pub fn touches_persisted_state(&self) -> bool {
        matches!(
            self,
            Event::TaskAdded { .. }
                | Event::TaskUpdated { .. }
                | Event::TaskRemoved { .. }
                | Event::TasksReordered { .. }
                | Event::TasksCleared { .. }
                | Event::RepeatModeChanged { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Explicit stop by the user.
    User,
    /// Last task finished with repeat off.
    Finished,
    /// The active task was deleted.
    ActiveTaskRemoved,
    /// The whole list was cleared.
    ListCleared,
    /// The active index no longer pointed at the task being timed.
    ActiveTaskLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    /// Countdown reached zero.
    Expired,
    /// User skipped ahead.
    Skipped,
}

/// The active task as seen by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTaskView {
    pub id: TaskId,
    pub name: String,
    pub duration: u32,
}

/// Read model of the whole state, for rendering and window sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: RunStatus,
    pub active_index: Option<usize>,
    pub active_task: Option<ActiveTaskView>,
    pub remaining_secs: u64,
    pub total_secs: u64,
    /// 0.0 .. 1.0 elapsed fraction of the active task.
    pub progress: f64,
    pub repeat_mode: RepeatMode,
    pub task_count: usize,
}
