// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - The event loop: terminal input, timer ticks, settled decisions
// - Rendering the page, the dialog and the status line

pub mod app;
pub mod components;
pub mod layout;
pub mod scroll;
pub mod theme;
pub mod traits;
pub mod views;

use crate::config::Config;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::{App, AppMessage};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done, even if the loop failed.
pub async fn run_tui(config: Config, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (mut app, mut messages_rx) = App::new(config, log_buffer);
    tracing::info!("modal form ready");

    let result = run_event_loop(&mut terminal, &mut app, &mut messages_rx).await;
    app.shutdown();

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Handles three kinds of events:
/// 1. Terminal input (keys and mouse)
/// 2. Ticks, which advance the dialog's timers and trigger a redraw
/// 3. Decisions settling in spawned tasks
///
/// Every iteration updates state with the current time, draws, and reports
/// the drawn frame so a freshly mounted dialog can enter.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    messages_rx: &mut mpsc::UnboundedReceiver<AppMessage>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(app.config.tui.frame_interval());

    loop {
        app.update(Instant::now());
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;
        app.on_frame();

        tokio::select! {
            // Keyboard or mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => app.handle_key(key, Instant::now()),
                        Ok(Event::Mouse(mouse)) => app.handle_mouse(mouse, Instant::now()),
                        Ok(_) => {}
                        Err(e) => tracing::warn!("failed to read terminal event: {}", e),
                    }
                }
            } => {}

            // Periodic tick: timers advance in the next update
            _ = tick_interval.tick() => {}

            Some(message) = messages_rx.recv() => {
                app.handle_message(message, Instant::now());
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
