//! Dialog configuration: heading copy and lifecycle timings

use crate::modal::DialogOptions;
use serde::Deserialize;
use std::time::Duration;

/// Dialog copy and timings
#[derive(Debug, Clone)]
pub struct DialogConfig {
    pub title: String,
    /// Empty means the dialog has no description
    pub description: String,
    /// Delay before focus moves to the dialog title after opening
    pub focus_delay_ms: u64,
    /// How long the dialog stays mounted after closing (exit transition)
    pub exit_delay_ms: u64,
}

impl Default for DialogConfig {
    fn default() -> Self {
        let options = DialogOptions::default();
        Self {
            title: options.title,
            description: options.description.unwrap_or_default(),
            focus_delay_ms: duration_ms(options.focus_delay),
            exit_delay_ms: duration_ms(options.exit_delay),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Dialog settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileDialog {
    pub title: Option<String>,
    pub description: Option<String>,
    pub focus_delay_ms: Option<u64>,
    pub exit_delay_ms: Option<u64>,
}

impl DialogConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileDialog>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            title: file.title.unwrap_or(defaults.title),
            description: file.description.unwrap_or(defaults.description),
            focus_delay_ms: file.focus_delay_ms.unwrap_or(defaults.focus_delay_ms),
            exit_delay_ms: file.exit_delay_ms.unwrap_or(defaults.exit_delay_ms),
        }
    }

    pub fn options(&self) -> DialogOptions {
        DialogOptions {
            title: self.title.clone(),
            description: Some(self.description.clone()).filter(|d| !d.trim().is_empty()),
            focus_delay: Duration::from_millis(self.focus_delay_ms),
            exit_delay: Duration::from_millis(self.exit_delay_ms),
        }
    }
}
