mod engine;
mod heartbeat;
mod progress;
mod repeat;

pub use engine::{RunStatus, TimerEngine};
pub use heartbeat::{Heartbeat, ManualHeartbeat};
pub use progress::{format_mm_ss, progress_fraction, seek_remaining};
pub use repeat::RepeatMode;
