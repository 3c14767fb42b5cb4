//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads or clocks - the owner arms a heartbeat and calls
//! `tick()` once per elapsed second while the engine is `Running`.
//!
//! The engine never owns task data. Every operation that needs a task
//! borrows the [`TaskList`] and re-validates the active index against the
//! id of the task it started timing.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^        |          |
//!   +--------+----------+   (stop, last task finished, active task removed)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::default();
//! engine.start(&tasks, 0)?;
//! // Once per second:
//! let events = engine.tick(&tasks);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::progress::{progress_fraction, seek_remaining};
use super::repeat::RepeatMode;
use crate::error::IndexError;
use crate::events::{ActiveTaskView, CompletionKind, Event, Snapshot, StopReason};
use crate::task::{Task, TaskId, TaskList};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Position and identity of the task being timed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveTask {
    index: usize,
    id: TaskId,
}

/// Core timer engine.
///
/// Invariant: `active` is `None` iff `status` is `Idle`, and
/// `remaining_secs` never exceeds the active task's duration.
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    status: RunStatus,
    active: Option<ActiveTask>,
    remaining_secs: u64,
    repeat_mode: RepeatMode,
}

impl TimerEngine {
    /// Create an idle engine with the given repeat preference.
    pub fn new(repeat_mode: RepeatMode) -> Self {
        Self {
            repeat_mode,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.index)
    }

    pub fn active_task_id(&self) -> Option<&TaskId> {
        self.active.as_ref().map(|a| &a.id)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    /// The task being timed, if the active index still refers to it.
    pub fn active_task<'a>(&self, tasks: &'a TaskList) -> Option<&'a Task> {
        let active = self.active.as_ref()?;
        tasks
            .get_index(active.index)
            .filter(|t| t.id == active.id)
    }

    pub fn snapshot(&self, tasks: &TaskList) -> Snapshot {
        let task = self.active_task(tasks);
        let total_secs = task.map(Task::duration_secs).unwrap_or(0);
        Snapshot {
            status: self.status,
            active_index: self.active_index(),
            active_task: task.map(|t| ActiveTaskView {
                id: t.id.clone(),
                name: t.name.clone(),
                duration: t.duration,
            }),
            remaining_secs: self.remaining_secs,
            total_secs,
            progress: progress_fraction(total_secs, self.remaining_secs),
            repeat_mode: self.repeat_mode,
            task_count: tasks.len(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start timing the task at `index` from its full duration.
    ///
    /// Works from any state; starting while running restarts on the new
    /// index. An out-of-range index is rejected and nothing changes.
    pub fn start(&mut self, tasks: &TaskList, index: usize) -> Result<Vec<Event>, IndexError> {
        let task = tasks.get_index(index).ok_or(IndexError {
            index,
            len: tasks.len(),
        })?;
        self.load(index, task);
        Ok(vec![Event::TimerStarted {
            index,
            task_id: task.id.clone(),
            duration_secs: task.duration_secs(),
            at: Utc::now(),
        }])
    }

    pub fn pause(&mut self) -> Vec<Event> {
        match self.status {
            RunStatus::Running => {
                self.status = RunStatus::Paused;
                vec![Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                }]
            }
            _ => Vec::new(),
        }
    }

    pub fn resume(&mut self) -> Vec<Event> {
        match self.status {
            RunStatus::Paused => {
                self.status = RunStatus::Running;
                vec![Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                }]
            }
            _ => Vec::new(),
        }
    }

    /// Pause when running, resume when paused, nothing when idle.
    pub fn toggle_pause(&mut self) -> Vec<Event> {
        match self.status {
            RunStatus::Running => self.pause(),
            RunStatus::Paused => self.resume(),
            RunStatus::Idle => Vec::new(),
        }
    }

    pub fn stop(&mut self) -> Vec<Event> {
        self.stop_with(StopReason::User)
    }

    /// Manually finish the active task and move on per the repeat mode.
    pub fn skip(&mut self, tasks: &TaskList) -> Vec<Event> {
        if self.status == RunStatus::Idle {
            return Vec::new();
        }
        let mut events = Vec::new();
        if let Some(index) = self.resolve_active(tasks, StopReason::ActiveTaskLost, &mut events) {
            self.complete(tasks, index, CompletionKind::Skipped, &mut events);
        }
        events
    }

    /// Advance the countdown by one second.
    ///
    /// A tick delivered while not `Running` (e.g. a heartbeat that was
    /// already queued when the timer was paused) does nothing.
    pub fn tick(&mut self, tasks: &TaskList) -> Vec<Event> {
        if self.status != RunStatus::Running {
            return Vec::new();
        }
        let mut events = Vec::new();
        let Some(index) = self.resolve_active(tasks, StopReason::ActiveTaskLost, &mut events)
        else {
            return events;
        };
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return events;
        }
        self.remaining_secs = 0;
        self.complete(tasks, index, CompletionKind::Expired, &mut events);
        events
    }

    /// Jump to `proportion` (0.0 .. 1.0) of the way through the active task.
    pub fn seek(&mut self, tasks: &TaskList, proportion: f64) -> Vec<Event> {
        self.adjust_remaining(tasks, |total| seek_remaining(total, proportion))
    }

    /// Set the remaining time directly, clamped to the task duration.
    pub fn set_remaining(&mut self, tasks: &TaskList, remaining_secs: u64) -> Vec<Event> {
        self.adjust_remaining(tasks, |total| remaining_secs.min(total))
    }

    /// Step the repeat preference `Off -> RepeatCurrent -> RepeatAll -> Off`.
    pub fn toggle_repeat_mode(&mut self) -> Vec<Event> {
        self.set_repeat_mode(self.repeat_mode.next())
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) -> Vec<Event> {
        if self.repeat_mode == mode {
            return Vec::new();
        }
        self.repeat_mode = mode;
        vec![Event::RepeatModeChanged {
            mode,
            at: Utc::now(),
        }]
    }

    /// Re-check the engine against the list after it was mutated.
    ///
    /// The countdown is clamped to the active task's (possibly edited)
    /// duration. If the active index no longer holds the task that was
    /// started, because it was removed or something shifted it, the
    /// engine stops.
    pub fn reconcile(&mut self, tasks: &TaskList) -> Vec<Event> {
        if self.status == RunStatus::Idle {
            return Vec::new();
        }
        let mut events = Vec::new();
        self.resolve_active(tasks, StopReason::ActiveTaskRemoved, &mut events);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    pub(crate) fn stop_with(&mut self, reason: StopReason) -> Vec<Event> {
        if self.status == RunStatus::Idle {
            return Vec::new();
        }
        self.status = RunStatus::Idle;
        self.active = None;
        self.remaining_secs = 0;
        vec![Event::TimerStopped {
            reason,
            at: Utc::now(),
        }]
    }

    fn load(&mut self, index: usize, task: &Task) {
        self.status = RunStatus::Running;
        self.active = Some(ActiveTask {
            index,
            id: task.id.clone(),
        });
        self.remaining_secs = task.duration_secs();
    }

    /// Index of the active task if it still sits where it was started.
    ///
    /// A task that is gone stops the engine with `gone`; a task that moved
    /// to another position stops it with `ActiveTaskLost`.
    fn resolve_active(
        &mut self,
        tasks: &TaskList,
        gone: StopReason,
        events: &mut Vec<Event>,
    ) -> Option<usize> {
        let found = match self.active.as_ref() {
            Some(active) => match tasks.get_index(active.index) {
                Some(task) if task.id == active.id => Ok((active.index, task.duration_secs())),
                _ if tasks.position(&active.id).is_some() => Err(StopReason::ActiveTaskLost),
                _ => Err(gone),
            },
            None => Err(gone),
        };
        let (index, total) = match found {
            Ok(found) => found,
            Err(reason) => {
                events.extend(self.stop_with(reason));
                return None;
            }
        };
        self.remaining_secs = self.remaining_secs.min(total);
        Some(index)
    }

    fn complete(
        &mut self,
        tasks: &TaskList,
        index: usize,
        kind: CompletionKind,
        events: &mut Vec<Event>,
    ) {
        let Some(finished) = self.active.as_ref().map(|a| a.id.clone()) else {
            return;
        };
        events.push(Event::TaskCompleted {
            index,
            task_id: finished,
            kind,
            at: Utc::now(),
        });

        let next = if self.repeat_mode == RepeatMode::RepeatCurrent {
            Some(index)
        } else if index + 1 < tasks.len() {
            Some(index + 1)
        } else if self.repeat_mode == RepeatMode::RepeatAll && !tasks.is_empty() {
            Some(0)
        } else {
            None
        };

        match next.and_then(|i| tasks.get_index(i).map(|t| (i, t))) {
            Some((to_index, task)) => {
                self.load(to_index, task);
                events.push(Event::TaskAdvanced {
                    from_index: index,
                    to_index,
                    task_id: task.id.clone(),
                    duration_secs: task.duration_secs(),
                    at: Utc::now(),
                });
            }
            None => events.extend(self.stop_with(StopReason::Finished)),
        }
    }

    fn adjust_remaining(
        &mut self,
        tasks: &TaskList,
        remaining_for_total: impl FnOnce(u64) -> u64,
    ) -> Vec<Event> {
        if self.status == RunStatus::Idle {
            return Vec::new();
        }
        let mut events = Vec::new();
        let Some(index) = self.resolve_active(tasks, StopReason::ActiveTaskLost, &mut events)
        else {
            return events;
        };
        let total = tasks.get_index(index).map(Task::duration_secs).unwrap_or(0);
        self.remaining_secs = remaining_for_total(total).min(total);
        events.push(Event::TimerSeeked {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        });
        events
    }
}
