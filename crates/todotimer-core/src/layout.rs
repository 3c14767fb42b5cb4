//! Window sizing for the widget.
//!
//! Pure function of the task count, the compact flag and the screen
//! height. The window manager calls it whenever the snapshot's
//! `task_count` changes or the view mode flips, and applies the result.

use serde::{Deserialize, Serialize};

use crate::storage::WindowConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowLayout {
    pub width: u32,
    pub base_height: u32,
    pub task_height: u32,
    pub compact_height: u32,
    pub max_visible_tasks: u32,
    pub max_screen_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
    /// The task list does not fit and must scroll.
    pub scrollable: bool,
}

impl Default for WindowLayout {
    fn default() -> Self {
        Self::from(&WindowConfig::default())
    }
}

impl WindowLayout {
    pub fn target(&self, task_count: usize, compact: bool, screen_height: u32) -> WindowSize {
        if compact {
            return WindowSize {
                width: self.width,
                height: self.compact_height,
                scrollable: false,
            };
        }

        let count = u32::try_from(task_count).unwrap_or(u32::MAX);
        let visible = count.min(self.max_visible_tasks);
        let wanted = self
            .base_height
            .saturating_add(visible.saturating_mul(self.task_height));
        let full = self
            .base_height
            .saturating_add(count.saturating_mul(self.task_height));

        let fraction = self.max_screen_fraction.clamp(0.0, 1.0);
        let cap = (f64::from(screen_height) * fraction).floor() as u32;

        WindowSize {
            width: self.width,
            height: wanted.min(cap),
            scrollable: full > wanted.min(cap),
        }
    }
}
