//! Application form component
//!
//! The body shown inside the dialog. Owns the field values and the
//! validation alert; hands validated data to `on_submit` or calls
//! `on_cancel`. Knows nothing about how the dialog opens or closes.

use crate::application::{self, ApplicationData, ValidationIssue, EXPERIENCE_OPTIONS};
use crate::modal::{
    BodyCallbacks, BodyRenderContext, DialogBody, Element, ElementId, ElementKind, FocusState,
    Live, Role,
};
use crate::tui::layout::{fit_tail, wrapped_height};
use crate::tui::traits::Handled;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub const ERROR_ID: &str = "validation-error";
pub const CANCEL_ID: &str = "cancel";
pub const SUBMIT_ID: &str = "submit";

const GITHUB_PLACEHOLDER: &str = "https://github.com/username";

/// Form fields in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Experience,
    GithubLink,
}

impl Field {
    const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Experience, Field::GithubLink];

    fn id(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Experience => "experience",
            Field::GithubLink => "github_link",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::Name => "Name / nickname",
            Field::Email => "Email",
            Field::Experience => "FE experience",
            Field::GithubLink => "GitHub link (optional)",
        }
    }

    fn required(self) -> bool {
        self != Field::GithubLink
    }

    fn from_id(id: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.id() == id)
    }
}

#[derive(Debug, Default)]
pub struct ApplicationForm {
    data: ApplicationData,
    issues: Vec<ValidationIssue>,
    show_error: bool,
    pending_announcement: Option<String>,
}

impl ApplicationForm {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn data(&self) -> &ApplicationData {
        &self.data
    }

    /// Alert text, while the alert is shown
    pub fn error_message(&self) -> Option<String> {
        (self.show_error && !self.issues.is_empty())
            .then(|| application::error_message(&self.issues))
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.data.name),
            Field::Email => Some(&mut self.data.email),
            Field::GithubLink => Some(&mut self.data.github_link),
            Field::Experience => None,
        }
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.data.name,
            Field::Email => &self.data.email,
            Field::Experience => application::experience_label(&self.data.experience),
            Field::GithubLink => &self.data.github_link,
        }
    }

    /// Any edit hides a shown validation error
    fn edited(&mut self) {
        if self.show_error {
            self.show_error = false;
            self.issues.clear();
        }
    }

    fn cycle_experience(&mut self, forward: bool) {
        let count = EXPERIENCE_OPTIONS.len();
        let current = EXPERIENCE_OPTIONS
            .iter()
            .position(|(value, _)| *value == self.data.experience)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.data.experience = EXPERIENCE_OPTIONS[next].0.to_string();
        self.edited();
    }

    fn submit(&mut self, focus: &mut FocusState, callbacks: &BodyCallbacks<ApplicationData>) {
        let issues = application::validate(&self.data);
        if issues.is_empty() {
            tracing::debug!(target: "modal_form::form", "form valid, submitting");
            (callbacks.on_submit)(self.data.clone());
            return;
        }

        let message = application::error_message(&issues);
        tracing::debug!(target: "modal_form::form", "validation failed: {}", message);
        self.issues = issues;
        self.show_error = true;
        self.pending_announcement = Some(message);
        focus.focus(ERROR_ID);
    }

    fn issue_for(&self, field: Field) -> bool {
        self.show_error && self.issues.iter().any(|i| i.field() == field.id())
    }
}

impl DialogBody for ApplicationForm {
    type Output = ApplicationData;

    fn elements(&self) -> Vec<Element> {
        let mut elements: Vec<Element> = Field::ALL
            .into_iter()
            .map(|field| {
                let kind = if field == Field::Experience {
                    ElementKind::Select
                } else {
                    ElementKind::Input
                };
                let described_by = self.issue_for(field).then(|| ElementId::from(ERROR_ID));
                Element::new(field.id(), kind)
                    .with_label(field.label())
                    .described_by(described_by)
            })
            .collect();

        if let Some(message) = self.error_message() {
            elements.push(
                Element::region(ERROR_ID)
                    .with_role(Role::Alert)
                    .with_live(Live::Assertive)
                    .with_tab_index(-1)
                    .with_label(message),
            );
        }
        elements.push(Element::button(CANCEL_ID, "Cancel"));
        elements.push(Element::button(SUBMIT_ID, "Submit"));
        elements
    }

    fn handle_key(
        &mut self,
        key: &KeyEvent,
        focus: &mut FocusState,
        callbacks: &BodyCallbacks<ApplicationData>,
    ) -> Handled {
        if key.kind == KeyEventKind::Release {
            return Handled::No;
        }
        let Some(active) = focus.active().map(|id| id.as_str().to_string()) else {
            return Handled::No;
        };

        if let Some(field) = Field::from_id(&active) {
            if key.code == KeyCode::Enter {
                // Enter inside a form submits it
                self.submit(focus, callbacks);
                return Handled::Yes;
            }
            if field == Field::Experience {
                return match key.code {
                    KeyCode::Left | KeyCode::Up => {
                        self.cycle_experience(false);
                        Handled::Yes
                    }
                    KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => {
                        self.cycle_experience(true);
                        Handled::Yes
                    }
                    _ => Handled::No,
                };
            }

            let typed = match key.code {
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    self.text_mut(field).map(|text| text.push(c)).is_some()
                }
                KeyCode::Backspace => self
                    .text_mut(field)
                    .map(|text| {
                        text.pop();
                    })
                    .is_some(),
                _ => false,
            };
            if typed {
                self.edited();
            }
            return Handled::from(typed);
        }

        let activate = matches!(key.code, KeyCode::Enter | KeyCode::Char(' '));
        match active.as_str() {
            SUBMIT_ID if activate => {
                self.submit(focus, callbacks);
                Handled::Yes
            }
            CANCEL_ID if activate => {
                (callbacks.on_cancel)();
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn activate(
        &mut self,
        id: &ElementId,
        focus: &mut FocusState,
        callbacks: &BodyCallbacks<ApplicationData>,
    ) -> Handled {
        match id.as_str() {
            SUBMIT_ID => self.submit(focus, callbacks),
            CANCEL_ID => (callbacks.on_cancel)(),
            "experience" => self.cycle_experience(true),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn height(&self, width: u16) -> u16 {
        // label + value + spacer per field, then the button row
        let fields = Field::ALL.len() as u16 * 3;
        let alert = self
            .error_message()
            .map(|m| wrapped_height(&format!("! {m}"), width) + 1)
            .unwrap_or(0);
        fields + alert + 1
    }

    fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        ctx: &BodyRenderContext<'_>,
    ) -> Vec<(ElementId, Rect)> {
        let theme = ctx.theme;
        let mut hits = Vec::new();
        let mut y = area.y;
        let row = |y: u16, height: u16| Rect::new(area.x, y, area.width, height).intersection(area);

        for field in Field::ALL {
            let focused = ctx.focus.is_focused_str(field.id());
            let invalid = self.issue_for(field);

            let mut label = vec![Span::styled(
                field.label(),
                Style::default().fg(theme.foreground),
            )];
            if field.required() {
                label.push(Span::styled(" *", Style::default().fg(theme.error)));
            }
            let label_rect = row(y, 1);
            frame.render_widget(Paragraph::new(Line::from(label)), label_rect);

            let value_rect = row(y + 1, 1);
            let width = usize::from(value_rect.width.saturating_sub(1));
            let value = self.value(field);
            let (text, text_style) = if field == Field::Experience {
                (format!("◂ {} ▸", value), Style::default().fg(theme.foreground))
            } else if value.is_empty() && field == Field::GithubLink && !focused {
                (GITHUB_PLACEHOLDER.to_string(), Style::default().fg(theme.muted))
            } else {
                let caret = if focused { "▏" } else { "" };
                let room = width.saturating_sub(usize::from(focused));
                (
                    format!("{}{}", fit_tail(value, room), caret),
                    Style::default().fg(theme.foreground),
                )
            };
            let base = if focused {
                theme.focus_style()
            } else if invalid {
                Style::default().fg(theme.error)
            } else {
                text_style
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, base.add_modifier(Modifier::UNDERLINED))),
                value_rect,
            );

            // Clicking a label focuses its control
            hits.push((ElementId::from(field.id()), label_rect));
            hits.push((ElementId::from(field.id()), value_rect));
            y = y.saturating_add(3);
        }

        if let Some(message) = self.error_message() {
            let text = format!("! {message}");
            let height = wrapped_height(&text, area.width);
            let rect = row(y, height);
            let style = if ctx.focus.is_focused_str(ERROR_ID) {
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
            };
            frame.render_widget(
                Paragraph::new(text).style(style).wrap(Wrap { trim: true }),
                rect,
            );
            hits.push((ElementId::from(ERROR_ID), rect));
            y = y.saturating_add(height + 1);
        }

        let half = area.width / 2;
        let cancel_rect = Rect::new(area.x, y, half.saturating_sub(1), 1).intersection(area);
        let submit_rect = Rect::new(area.x + half, y, area.width - half, 1).intersection(area);
        for (id, label, rect) in [
            (CANCEL_ID, "Cancel", cancel_rect),
            (SUBMIT_ID, "Submit", submit_rect),
        ] {
            let style = if ctx.focus.is_focused_str(id) {
                theme.focus_style()
            } else if id == SUBMIT_ID {
                Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.foreground)
            };
            frame.render_widget(
                Paragraph::new(Line::from(format!("[ {label} ]")).centered()).style(style),
                rect,
            );
            hits.push((ElementId::from(id), rect));
        }

        hits
    }

    fn take_announcement(&mut self) -> Option<String> {
        self.pending_announcement.take()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
