//! Application state root.
//!
//! [`TodoTimer`] owns the task list, the timer engine and the heartbeat,
//! and is the single writer for all of them. Front ends hold it by value
//! (or behind whatever cell their event loop needs) and subscribe
//! observers for reactive updates.
//!
//! After every operation the root:
//! 1. re-aligns the engine with the list if the list changed,
//! 2. arms or cancels the heartbeat to match the run status,
//! 3. marks the persisted part dirty when tasks or repeat mode changed,
//! 4. hands every event plus a fresh snapshot to the observers.

use tracing::{debug, info};

use crate::error::{IndexError, ValidationError};
use crate::events::{Event, Snapshot, StopReason};
use crate::storage::{PersistedState, StateStore};
use crate::task::{Task, TaskId, TaskList, TaskUpdate};
use crate::timer::{Heartbeat, RepeatMode, TimerEngine};

/// Receives every event together with the state after it was applied.
pub trait Observer {
    fn on_event(&mut self, event: &Event, snapshot: &Snapshot);
}

impl<F> Observer for F
where
    F: FnMut(&Event, &Snapshot),
{
    fn on_event(&mut self, event: &Event, snapshot: &Snapshot) {
        self(event, snapshot)
    }
}

/// Handle returned by [`TodoTimer::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct TodoTimer<H: Heartbeat> {
    tasks: TaskList,
    engine: TimerEngine,
    heartbeat: H,
    observers: Vec<(SubscriptionId, Box<dyn Observer>)>,
    next_subscription: u64,
    dirty: bool,
}

impl<H: Heartbeat> TodoTimer<H> {
    /// Empty list, repeat off, idle.
    pub fn new(heartbeat: H) -> Self {
        Self::from_persisted(PersistedState::default(), heartbeat)
    }

    /// Restore from a persisted snapshot. Always starts idle.
    pub fn from_persisted(state: PersistedState, heartbeat: H) -> Self {
        let tasks = TaskList::from_tasks(state.tasks);
        debug!(tasks = tasks.len(), repeat = %state.repeat_mode, "restored state");
        Self {
            tasks,
            engine: TimerEngine::new(state.repeat_mode),
            heartbeat,
            observers: Vec::new(),
            next_subscription: 0,
            dirty: false,
        }
    }

    /// Restore from `store`, or start empty when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Storage`] if the store cannot be read.
    pub fn open<S: StateStore>(store: &S, heartbeat: H) -> crate::error::Result<Self> {
        let state = store.load()?.unwrap_or_default();
        Ok(Self::from_persisted(state, heartbeat))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn heartbeat(&self) -> &H {
        &self.heartbeat
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot(&self.tasks)
    }

    /// The part of the state that survives a restart.
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            tasks: self.tasks.as_slice().to_vec(),
            repeat_mode: self.engine.repeat_mode(),
        }
    }

    /// Whether the persisted part changed since the last `take_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    // ── Task list ────────────────────────────────────────────────────

    pub fn add_task(&mut self, name: &str, duration: u32) -> Result<Task, ValidationError> {
        let was_running = self.engine.is_running();
        let task = self.tasks.add(name, duration)?;
        debug!(id = %task.id, name = %task.name, duration, "task added");
        let event = Event::TaskAdded {
            task: task.clone(),
            index: self.tasks.len() - 1,
            at: chrono::Utc::now(),
        };
        self.dispatch(was_running, vec![event]);
        Ok(task)
    }

    /// Returns `Ok(false)` when no task has `id`.
    pub fn update_task(&mut self, id: &TaskId, update: TaskUpdate) -> Result<bool, ValidationError> {
        let was_running = self.engine.is_running();
        if !self.tasks.update(id, update)? {
            return Ok(false);
        }
        let Some(task) = self.tasks.get(id).cloned() else {
            return Ok(false);
        };
        debug!(id = %task.id, "task updated");
        let mut events = vec![Event::TaskUpdated {
            task,
            at: chrono::Utc::now(),
        }];
        events.extend(self.engine.reconcile(&self.tasks));
        self.dispatch(was_running, events);
        Ok(true)
    }

    /// Remove a task. The timer stops if the active task is removed or
    /// shifted to another index.
    pub fn remove_task(&mut self, id: &TaskId) -> bool {
        let was_running = self.engine.is_running();
        let Some((index, task)) = self.tasks.remove(id) else {
            return false;
        };
        debug!(id = %task.id, index, "task removed");
        let mut events = vec![Event::TaskRemoved {
            id: task.id,
            index,
            at: chrono::Utc::now(),
        }];
        events.extend(self.engine.reconcile(&self.tasks));
        self.dispatch(was_running, events);
        true
    }

    /// Move a task. A running timer stops if its task no longer sits at
    /// the active index afterwards.
    pub fn reorder_tasks(&mut self, from: usize, to: usize) -> Result<(), IndexError> {
        let was_running = self.engine.is_running();
        self.tasks.reorder(from, to)?;
        if from == to {
            return Ok(());
        }
        debug!(from, to, "tasks reordered");
        let mut events = vec![Event::TasksReordered {
            from,
            to,
            at: chrono::Utc::now(),
        }];
        events.extend(self.engine.reconcile(&self.tasks));
        self.dispatch(was_running, events);
        Ok(())
    }

    /// Remove every task and force the timer to stop.
    pub fn clear_tasks(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let was_running = self.engine.is_running();
        self.tasks.clear();
        info!("task list cleared");
        let mut events = vec![Event::TasksCleared {
            at: chrono::Utc::now(),
        }];
        events.extend(self.engine.stop_with(StopReason::ListCleared));
        self.dispatch(was_running, events);
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self, index: usize) -> Result<(), IndexError> {
        let was_running = self.engine.is_running();
        let events = self.engine.start(&self.tasks, index)?;
        info!(index, "timer started");
        // A restart on another task re-arms so the first second is whole.
        if was_running {
            self.heartbeat.arm();
        }
        self.dispatch(was_running, events);
        Ok(())
    }

    pub fn pause(&mut self) {
        let was_running = self.engine.is_running();
        let events = self.engine.pause();
        self.dispatch(was_running, events);
    }

    pub fn resume(&mut self) {
        let was_running = self.engine.is_running();
        let events = self.engine.resume();
        self.dispatch(was_running, events);
    }

    pub fn toggle_pause(&mut self) {
        let was_running = self.engine.is_running();
        let events = self.engine.toggle_pause();
        self.dispatch(was_running, events);
    }

    pub fn stop(&mut self) {
        let was_running = self.engine.is_running();
        let events = self.engine.stop();
        if !events.is_empty() {
            info!("timer stopped");
        }
        self.dispatch(was_running, events);
    }

    pub fn skip(&mut self) {
        let was_running = self.engine.is_running();
        let events = self.engine.skip(&self.tasks);
        self.dispatch(was_running, events);
    }

    /// Heartbeat entry point. Stale ticks after a pause/stop are ignored.
    pub fn tick(&mut self) {
        let was_running = self.engine.is_running();
        let events = self.engine.tick(&self.tasks);
        self.dispatch(was_running, events);
    }

    pub fn seek(&mut self, proportion: f64) {
        let was_running = self.engine.is_running();
        let events = self.engine.seek(&self.tasks, proportion);
        self.dispatch(was_running, events);
    }

    pub fn set_remaining(&mut self, remaining_secs: u64) {
        let was_running = self.engine.is_running();
        let events = self.engine.set_remaining(&self.tasks, remaining_secs);
        self.dispatch(was_running, events);
    }

    pub fn toggle_repeat_mode(&mut self) -> RepeatMode {
        let was_running = self.engine.is_running();
        let events = self.engine.toggle_repeat_mode();
        self.dispatch(was_running, events);
        self.engine.repeat_mode()
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        let was_running = self.engine.is_running();
        let events = self.engine.set_repeat_mode(mode);
        self.dispatch(was_running, events);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn dispatch(&mut self, was_running: bool, events: Vec<Event>) {
        self.sync_heartbeat(was_running);
        if events.is_empty() {
            return;
        }
        if events.iter().any(Event::touches_persisted_state) {
            self.dirty = true;
        }
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for event in &events {
            for (_, observer) in self.observers.iter_mut() {
                observer.on_event(event, &snapshot);
            }
        }
    }

    fn sync_heartbeat(&mut self, was_running: bool) {
        let running = self.engine.is_running();
        if running && (!was_running || !self.heartbeat.is_armed()) {
            self.heartbeat.arm();
        } else if !running && (was_running || self.heartbeat.is_armed()) {
            self.heartbeat.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, StorageError};
    use crate::events::CompletionKind;
    use crate::storage::MemoryStore;
    use crate::timer::{ManualHeartbeat, RunStatus};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn app_with(entries: &[(&str, u32)]) -> TodoTimer<ManualHeartbeat> {
        let mut app = TodoTimer::new(ManualHeartbeat::new());
        for (name, duration) in entries {
            app.add_task(name, *duration).unwrap();
        }
        app.take_dirty();
        app
    }

    fn record(app: &mut TodoTimer<ManualHeartbeat>) -> Rc<RefCell<Vec<Event>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        app.subscribe(Box::new(move |event: &Event, _: &Snapshot| {
            sink.borrow_mut().push(event.clone());
        }));
        seen
    }

    #[test]
    fn heartbeat_follows_run_status() {
        let mut app = app_with(&[("A", 1)]);
        assert!(!app.heartbeat().is_armed());

        app.start(0).unwrap();
        assert!(app.heartbeat().is_armed());

        app.pause();
        assert!(!app.heartbeat().is_armed());

        app.resume();
        assert!(app.heartbeat().is_armed());

        app.stop();
        assert!(!app.heartbeat().is_armed());
        assert_eq!(app.heartbeat().arm_count(), 2);
        assert_eq!(app.heartbeat().cancel_count(), 2);
    }

    #[test]
    fn heartbeat_cancelled_when_run_finishes() {
        let mut app = app_with(&[("A", 1)]);
        app.start(0).unwrap();
        for _ in 0..60 {
            app.tick();
        }
        assert_eq!(app.engine().status(), RunStatus::Idle);
        assert!(!app.heartbeat().is_armed());
    }

    #[test]
    fn removing_active_task_stops_timer() {
        let mut app = app_with(&[("A", 5), ("B", 10)]);
        let a = app.tasks().get_index(0).unwrap().id.clone();
        app.start(0).unwrap();

        assert!(app.remove_task(&a));
        assert_eq!(app.engine().status(), RunStatus::Idle);
        assert_eq!(app.engine().active_index(), None);
        assert!(!app.heartbeat().is_armed());
    }

    #[test]
    fn removing_earlier_task_stops_timer() {
        let mut app = app_with(&[("A", 5), ("B", 10)]);
        let a = app.tasks().get_index(0).unwrap().id.clone();
        app.start(1).unwrap();
        app.tick();

        app.remove_task(&a);
        assert_eq!(app.engine().status(), RunStatus::Idle);
        assert_eq!(app.engine().active_index(), None);
        assert!(!app.heartbeat().is_armed());
    }

    #[test]
    fn removing_later_task_keeps_timer_running() {
        let mut app = app_with(&[("A", 5), ("B", 10)]);
        let b = app.tasks().get_index(1).unwrap().id.clone();
        app.start(0).unwrap();
        app.tick();

        app.remove_task(&b);
        assert_eq!(app.engine().status(), RunStatus::Running);
        assert_eq!(app.engine().active_index(), Some(0));
        assert_eq!(app.engine().remaining_secs(), 299);
    }

    #[test]
    fn restart_while_running_rearms_heartbeat() {
        let mut app = app_with(&[("A", 5), ("B", 10)]);
        app.start(0).unwrap();
        assert_eq!(app.heartbeat().arm_count(), 1);

        app.start(1).unwrap();
        assert_eq!(app.heartbeat().arm_count(), 2);
        assert!(app.heartbeat().is_armed());
        assert_eq!(app.engine().active_index(), Some(1));
        assert_eq!(app.engine().remaining_secs(), 600);
    }

    #[test]
    fn start_while_paused_arms_heartbeat_once() {
        let mut app = app_with(&[("A", 5), ("B", 10)]);
        app.start(0).unwrap();
        app.pause();

        app.start(1).unwrap();
        assert_eq!(app.engine().status(), RunStatus::Running);
        assert_eq!(app.heartbeat().arm_count(), 2);
        assert_eq!(app.heartbeat().cancel_count(), 1);
    }

    #[test]
    fn clearing_empty_list_is_a_no_op() {
        let mut app = app_with(&[]);
        let seen = record(&mut app);
        app.clear_tasks();
        assert!(seen.borrow().is_empty());
        assert!(!app.is_dirty());
    }

    #[test]
    fn clearing_stops_timer() {
        let mut app = app_with(&[("A", 5)]);
        app.start(0).unwrap();
        app.clear_tasks();
        assert!(app.tasks().is_empty());
        assert_eq!(app.engine().status(), RunStatus::Idle);
        assert!(app.is_dirty());
    }

    #[test]
    fn observers_see_completion_and_snapshot() {
        let mut app = app_with(&[("A", 1), ("B", 1)]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        app.subscribe(Box::new(move |event: &Event, snap: &Snapshot| {
            if let Event::TaskCompleted { kind, .. } = event {
                sink.borrow_mut().push((*kind, snap.active_index));
            }
        }));

        app.start(0).unwrap();
        app.skip();
        for _ in 0..60 {
            app.tick();
        }
        assert_eq!(
            *seen.borrow(),
            vec![
                (CompletionKind::Skipped, Some(1)),
                (CompletionKind::Expired, None),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut app = app_with(&[("A", 1)]);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = app.subscribe(Box::new(move |_: &Event, _: &Snapshot| {
            *sink.borrow_mut() += 1;
        }));
        app.start(0).unwrap();
        assert!(app.unsubscribe(id));
        assert!(!app.unsubscribe(id));
        app.stop();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn only_persisted_changes_mark_dirty() {
        let mut app = app_with(&[("A", 1)]);
        app.start(0).unwrap();
        app.tick();
        app.pause();
        assert!(!app.is_dirty());

        app.toggle_repeat_mode();
        assert!(app.take_dirty());
        assert!(!app.is_dirty());
    }

    #[test]
    fn rejected_operations_emit_nothing() {
        let mut app = app_with(&[("A", 1)]);
        let seen = record(&mut app);
        assert!(app.add_task("  ", 5).is_err());
        assert!(app.start(3).is_err());
        assert!(app.reorder_tasks(0, 4).is_err());
        app.pause();
        app.seek(0.5);
        assert!(seen.borrow().is_empty());
        assert!(!app.is_dirty());
    }

    #[test]
    fn persisted_state_excludes_run_state() {
        let mut app = app_with(&[("A", 1), ("B", 2)]);
        app.set_repeat_mode(RepeatMode::RepeatAll);
        app.start(1).unwrap();

        let state = app.persisted_state();
        let restored = TodoTimer::from_persisted(state, ManualHeartbeat::new());
        assert_eq!(restored.tasks(), app.tasks());
        assert_eq!(restored.engine().repeat_mode(), RepeatMode::RepeatAll);
        assert_eq!(restored.engine().status(), RunStatus::Idle);
    }

    struct UnreadableStore;

    impl StateStore for UnreadableStore {
        fn load(&self) -> Result<Option<PersistedState>, StorageError> {
            Err(StorageError::NoDataDir)
        }

        fn save(&self, _state: &PersistedState) -> Result<(), StorageError> {
            Err(StorageError::NoDataDir)
        }
    }

    #[test]
    fn open_restores_saved_state() {
        let saved = app_with(&[("A", 1), ("B", 2)]).persisted_state();
        let store = MemoryStore::with_state(saved.clone());
        let app = TodoTimer::open(&store, ManualHeartbeat::new()).unwrap();
        assert_eq!(app.persisted_state(), saved);
        assert_eq!(app.engine().status(), RunStatus::Idle);
    }

    #[test]
    fn open_starts_empty_without_saved_state() {
        let app = TodoTimer::open(&MemoryStore::new(), ManualHeartbeat::new()).unwrap();
        assert!(app.tasks().is_empty());
        assert_eq!(app.engine().repeat_mode(), RepeatMode::Off);
    }

    #[test]
    fn open_reports_storage_errors() {
        let result = TodoTimer::open(&UnreadableStore, ManualHeartbeat::new());
        assert!(matches!(
            result,
            Err(CoreError::Storage(StorageError::NoDataDir))
        ));
    }
}
