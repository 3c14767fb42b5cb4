//! Completion sound collaborator.
//!
//! Playback is fire-and-forget: a failing player is logged and otherwise
//! ignored, it never reaches the user or the state machine.

use tracing::{debug, warn};

use crate::app::Observer;
use crate::events::{Event, Snapshot};

#[derive(Debug, thiserror::Error)]
pub enum SoundError {
    #[error("audio device unavailable: {0}")]
    Unavailable(String),

    #[error("playback failed: {0}")]
    Playback(String),
}

pub trait SoundPlayer {
    fn play(&mut self) -> Result<(), SoundError>;
}

/// Player that does nothing. Used when sound is disabled in config.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&mut self) -> Result<(), SoundError> {
        Ok(())
    }
}

/// Plays a sound for every `TaskCompleted` event.
pub struct SoundObserver<P: SoundPlayer> {
    player: P,
}

impl<P: SoundPlayer> SoundObserver<P> {
    pub fn new(player: P) -> Self {
        Self { player }
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

impl<P: SoundPlayer> Observer for SoundObserver<P> {
    fn on_event(&mut self, event: &Event, _snapshot: &Snapshot) {
        let Event::TaskCompleted { task_id, kind, .. } = event else {
            return;
        };
        debug!(id = %task_id, ?kind, "playing completion sound");
        if let Err(e) = self.player.play() {
            warn!(error = %e, "completion sound failed");
        }
    }
}
