// Modal Form - an accessible modal dialog in the terminal
//
// A page with a trigger button opens an application form in a modal dialog
// and awaits the user's decision: the submitted data, or nothing when the
// dialog is cancelled.
//
// Architecture:
// - Modal core: element tree, focus trap, animation lifecycle, scroll lock,
//   escape binding and the single-slot decision service
// - Application: form data and validation
// - TUI (ratatui): page, dialog, form, logs panel and status line
// - Logging: tracing captured into an in-memory buffer for the logs panel

mod application;
mod cli;
mod config;
mod logging;
mod modal;
mod tui;

use anyhow::Result;
use config::{Config, LogRotation, LoggingConfig};
use logging::{LogBuffer, TuiLogLayer};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, --path)
    if cli::handle_cli() {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env();

    let log_buffer = LogBuffer::new();
    // Keep the guard alive for the whole run so file logs flush
    let _file_guard = init_tracing(&config, &log_buffer);

    tracing::debug!(
        "config: theme={} focus_delay={}ms exit_delay={}ms",
        config.theme,
        config.dialog.focus_delay_ms,
        config.dialog.exit_delay_ms
    );

    tui::run_tui(config, log_buffer).await
}

/// Capture logs into the TUI buffer, plus JSON lines on disk when enabled
///
/// Nothing goes to stdout: it would garble the alternate screen.
/// Precedence: RUST_LOG env var > config file > default "info".
fn init_tracing(config: &Config, log_buffer: &LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!("modal_form={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let (file_layer, guard) = match file_writer(&config.logging) {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(TuiLogLayer::new(log_buffer.clone()))
        .with(file_layer)
        .init();

    guard
}

/// Rolling non-blocking file writer, if file logging is enabled and possible
fn file_writer(logging: &LoggingConfig) -> Option<(NonBlocking, WorkerGuard)> {
    if !logging.file_enabled {
        return None;
    }
    if let Err(e) = std::fs::create_dir_all(&logging.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            logging.file_dir, e
        );
        return None;
    }

    let appender = match logging.file_rotation {
        LogRotation::Hourly => {
            tracing_appender::rolling::hourly(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Daily => {
            tracing_appender::rolling::daily(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Never => {
            tracing_appender::rolling::never(&logging.file_dir, &logging.file_prefix)
        }
    };
    Some(tracing_appender::non_blocking(appender))
}
