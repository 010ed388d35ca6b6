//! TUI settings: frame pacing and panel visibility

use serde::Deserialize;
use std::time::Duration;

/// Event loop and panel settings
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Tick interval driving timers and redraws
    pub frame_ms: u64,
    /// Show the logs panel at startup
    pub show_logs: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            show_logs: false,
        }
    }
}

/// TUI settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileTui {
    pub frame_ms: Option<u64>,
    pub show_logs: Option<bool>,
}

impl TuiConfig {
    pub fn from_file(file: Option<FileTui>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            // A zero tick would spin the loop
            frame_ms: file.frame_ms.unwrap_or(defaults.frame_ms).max(1),
            show_logs: file.show_logs.unwrap_or(defaults.show_logs),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}
