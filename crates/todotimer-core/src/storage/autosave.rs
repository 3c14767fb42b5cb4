use std::time::Instant;
use tracing::warn;

use super::debounce::Debouncer;
use super::state::StateStore;
use crate::app::TodoTimer;
use crate::error::StorageError;
use crate::timer::Heartbeat;

/// Debounced persistence collaborator.
///
/// Call [`AutoSave::poll`] after handling each event (and on every
/// heartbeat); it writes once the state has been quiet for the configured
/// delay. [`AutoSave::flush`] writes immediately, for shutdown.
pub struct AutoSave<S: StateStore> {
    store: S,
    debouncer: Debouncer,
}

impl<S: StateStore> AutoSave<S> {
    pub fn new(store: S, debouncer: Debouncer) -> Self {
        Self { store, debouncer }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Returns `true` when a write went out.
    pub fn poll<H: Heartbeat>(&mut self, app: &mut TodoTimer<H>, now: Instant) -> bool {
        if app.take_dirty() {
            self.debouncer.mark(now);
        }
        if !self.debouncer.ready(now) {
            return false;
        }
        match self.store.save(&app.persisted_state()) {
            Ok(()) => {
                self.debouncer.clear();
                true
            }
            Err(e) => {
                // Retry after another quiet period.
                warn!(error = %e, "failed to save state");
                self.debouncer.mark(now);
                false
            }
        }
    }

    /// Write now if anything changed since the last write.
    pub fn flush<H: Heartbeat>(&mut self, app: &mut TodoTimer<H>) -> Result<bool, StorageError> {
        if !app.take_dirty() && !self.debouncer.is_pending() {
            return Ok(false);
        }
        self.store.save(&app.persisted_state())?;
        self.debouncer.clear();
        Ok(true)
    }
}
