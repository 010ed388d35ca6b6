//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize to a commented TOML document that `FileConfig` parses back
    pub fn to_toml(&self) -> String {
        format!(
            r#"# modal-form configuration

# Theme: dark, light
theme = {theme}

# Application dialog
[dialog]
title = {title}
# Leave empty for a dialog without a description
description = {description}
# Delay before focus moves to the dialog title after opening
focus_delay_ms = {focus_delay}
# How long the dialog stays on screen after closing (exit transition)
exit_delay_ms = {exit_delay}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# JSON file logging in addition to the in-TUI logs panel
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}

[tui]
# Tick interval in milliseconds
frame_ms = {frame_ms}
# Show the logs panel (F2) at startup
show_logs = {show_logs}
"#,
            theme = toml_string(&self.theme),
            title = toml_string(&self.dialog.title),
            description = toml_string(&self.dialog.description),
            focus_delay = self.dialog.focus_delay_ms,
            exit_delay = self.dialog.exit_delay_ms,
            log_level = toml_string(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_string(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = toml_string(&self.logging.file_prefix),
            frame_ms = self.tui.frame_ms,
            show_logs = self.tui.show_logs,
        )
    }
}

/// Quote a string as a TOML basic string
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
