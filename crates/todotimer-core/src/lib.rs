//! # Todo Timer Core Library
//!
//! This library provides the core logic for Todo Timer, a sequential task
//! timer: an ordered list of named, timed tasks that is run through one
//! task at a time. The CLI (and any GUI shell) is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Task List**: ordered, id-addressed tasks with validated fields
//! - **Timer Engine**: a tick-driven state machine that requires the caller
//!   to invoke `tick()` once per second while running
//! - **App root**: [`TodoTimer`] owns both, keeps them in sync, drives the
//!   heartbeat and publishes events to observers
//! - **Storage**: JSON-persisted tasks and repeat preference, TOML
//!   configuration
//!
//! ## Key Components
//!
//! - [`TodoTimer`]: owned application state
//! - [`TaskList`]: task list manager
//! - [`TimerEngine`]: timer state machine
//! - [`Heartbeat`]: injectable one-second driver
//! - [`Config`]: application configuration management

pub mod app;
pub mod error;
pub mod events;
pub mod layout;
pub mod sound;
pub mod storage;
pub mod task;
pub mod timer;

pub use app::{Observer, SubscriptionId, TodoTimer};
pub use error::{ConfigError, CoreError, IndexError, Result, StorageError, ValidationError};
pub use events::{ActiveTaskView, CompletionKind, Event, Snapshot, StopReason};
pub use layout::{WindowLayout, WindowSize};
pub use sound::{SilentPlayer, SoundError, SoundObserver, SoundPlayer};
pub use storage::{AutoSave, Config, Debouncer, JsonFileStore, MemoryStore, PersistedState, StateStore};
pub use task::{Task, TaskId, TaskList, TaskUpdate};
pub use timer::{Heartbeat, ManualHeartbeat, RepeatMode, RunStatus, TimerEngine};
