// Status bar component
//
// Bottom line of the screen. Doubles as the live region: the latest
// announcement is shown on the left, keybind hints on the right.

use crate::modal::Live;
use crate::tui::app::App;
use crate::tui::layout::{fit_tail, Breakpoint};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Render the live region and hints
///
/// Adapts to terminal width:
/// - Wide: announcement, hints and uptime
/// - Normal: announcement and hints
/// - Compact: announcement only, hints when there is none
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let bp = Breakpoint::from_width(area.width);
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let announcement = app.announcer.current().map(|a| {
        let style = match a.live {
            Live::Assertive => Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            Live::Polite => Style::default().fg(theme.foreground),
        };
        (a.text.as_str(), style)
    });

    let mut hints = app.status_hint();
    if bp.at_least(Breakpoint::Wide) {
        hints.push_str(&format!("  │ {}", app.uptime()));
    }

    if !bp.at_least(Breakpoint::Normal) {
        let line = match announcement {
            Some((text, style)) => Line::from(Span::styled(format!(" » {}", text), style)),
            None => Line::from(Span::styled(
                format!(" {}", fit_tail(&hints, usize::from(inner.width))),
                Style::default().fg(theme.status_bar),
            )),
        };
        f.render_widget(Paragraph::new(line), inner);
        return;
    }

    let hints_width = u16::try_from(hints.width() + 1)
        .unwrap_or(u16::MAX)
        .min(inner.width / 2);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(hints_width)])
        .split(inner);

    if let Some((text, style)) = announcement {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" » {}", text), style))),
            chunks[0],
        );
    }
    f.render_widget(
        Paragraph::new(Line::from(hints).right_aligned())
            .style(Style::default().fg(theme.status_bar)),
        chunks[1],
    );
}
