// Views module - screen-level rendering
//
// One screen: the trigger page, an optional logs panel, the status line.
// The dialog draws over all of it when mounted; the status line and toast
// go on top so announcements stay readable behind the backdrop.

use super::app::App;
use crate::tui::components;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Rows given to the logs panel when shown
const LOGS_HEIGHT: u16 = 8;
const STATUS_HEIGHT: u16 = 2;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let mut constraints = vec![Constraint::Min(5)];
    if app.show_logs {
        constraints.push(Constraint::Length(LOGS_HEIGHT));
    }
    constraints.push(Constraint::Length(STATUS_HEIGHT));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    app.page.render(f, chunks[0], &app.theme, &app.focus);
    if app.show_logs {
        render_logs(f, chunks[1], app);
    }

    app.dialog.render(f, &app.form, &app.focus, &app.theme);

    if let Some(status) = chunks.last() {
        components::status_bar::render(f, *status, app);
    }

    if let Some(ref toast) = app.toast {
        toast.render(f, f.area(), &app.theme);
    }
}

fn render_logs(f: &mut Frame, area: Rect, app: &mut App) {
    let entries = app.log_buffer.get_all();
    let height = usize::from(area.height.saturating_sub(2));
    app.logs_panel.sync_entries(&entries, height);
    app.logs_panel
        .render_with_entries(f, area, &entries, &app.theme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logging::LogBuffer;
    use crossterm::event::{KeyCode, KeyEvent};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::{Duration, Instant};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn page_then_dialog_render() {
        let (mut app, _rx) = App::new(Config::default(), LogBuffer::new());
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let t0 = Instant::now();

        app.update(t0);
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("Accessible Modal Form"));
        assert!(text.contains("Fill in the application"));
        assert!(!text.contains("Application form"));

        app.handle_key(KeyEvent::from(KeyCode::Enter), t0);
        app.update(t0);
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        app.on_frame();
        app.update(t0 + Duration::from_millis(100));
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Application form"));
        assert!(text.contains("[x]"));
        // Heading announced on the status line
        assert!(text.contains("» Dialog: Application form."));
    }

    #[tokio::test]
    async fn logs_panel_toggles_layout() {
        let (mut app, _rx) = App::new(Config::default(), LogBuffer::new());
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        app.handle_key(KeyEvent::from(KeyCode::F(2)), Instant::now());
        assert!(app.show_logs);
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        assert!(screen(&terminal).contains("System Logs"));
    }
}
