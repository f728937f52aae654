//! View rendering dispatch.

pub mod panel;

use crate::state::App;
use crate::theme::connection_color;
use crate::widgets::StatusIndicator;
use notify_core::{ConnectionState, WidgetState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders},
    Frame,
};

const KEY_HINT: &str = "Tab switch • j/k move • r remount • q quit";

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);
    render_panels(f, app, layout[1]);
    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!("NotifyMe | {}", app.config.api_base_url);
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default().fg(app.theme.primary),
    ));
    f.render_widget(block, area);
}

fn render_panels(f: &mut Frame<'_>, app: &App, area: Rect) {
    if app.widgets.is_empty() {
        return;
    }
    let share = 100 / app.widgets.len() as u16;
    let constraints: Vec<Constraint> = app
        .widgets
        .iter()
        .map(|_| Constraint::Percentage(share))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (widget, column) in app.widgets.iter().zip(columns.iter()) {
        let focused = widget.kind() == app.focus;
        panel::render(f, widget, &app.theme, focused, *column);
    }
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (label, status, color) = match app.focused() {
        Some(widget) => (
            widget.kind().title(),
            channel_status_text(&widget.state),
            connection_color(widget.state.phase(), &app.theme),
        ),
        None => ("Channel", "not mounted".to_string(), app.theme.text_dim),
    };
    let indicator = StatusIndicator {
        label,
        status,
        status_style: Style::default().fg(color),
        hint: KEY_HINT,
        hint_style: Style::default().fg(app.theme.text_dim),
    };
    indicator.render(f, area);
}

/// Human-readable live channel phase for the footer.
pub fn channel_status_text(state: &WidgetState) -> String {
    if state.gave_up() {
        return "gave up reconnecting (press r to remount)".to_string();
    }
    match state.phase() {
        ConnectionState::Disconnected => "disconnected".to_string(),
        ConnectionState::Connecting { attempt: 0 } => "connecting".to_string(),
        ConnectionState::Connecting { attempt } => format!("reconnecting (attempt {})", attempt),
        ConnectionState::Open => "live".to_string(),
        ConnectionState::RetryPending { delay, .. } => {
            format!("retry in {} ms", delay.as_millis())
        }
        ConnectionState::Terminated => "closed".to_string(),
    }
}
