//! One widget panel: loading, error, empty, or the item list.

use crate::mount::MountedWidget;
use crate::theme::{tone_color, Theme};
use notify_core::{panel_title, WidgetView};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, widget: &MountedWidget, theme: &Theme, focused: bool, area: Rect) {
    let border = if focused { theme.border_focus } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            panel_title(&widget.state),
            Style::default().fg(theme.primary),
        ));

    match WidgetView::from_state(&widget.state) {
        WidgetView::Loading(text) => {
            let body = Paragraph::new(text)
                .style(Style::default().fg(theme.text_dim))
                .block(block);
            f.render_widget(body, area);
        }
        WidgetView::Error(message) => {
            let body = Paragraph::new(message)
                .style(Style::default().fg(theme.error))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(body, area);
        }
        WidgetView::Empty(text) => {
            let body = Paragraph::new(text)
                .style(Style::default().fg(theme.text_dim))
                .block(block);
            f.render_widget(body, area);
        }
        WidgetView::Items(rows) => {
            let items: Vec<ListItem> = rows
                .into_iter()
                .map(|row| {
                    let style = Style::default().fg(tone_color(row.tone, theme));
                    ListItem::new(Line::from(Span::styled(row.message, style)))
                })
                .collect();
            let mut state = ListState::default();
            state.select(widget.selected);
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            f.render_stateful_widget(list, area, &mut state);
        }
    }
}
