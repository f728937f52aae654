//! Status line widget: a label, a value, and a bordered box.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct StatusIndicator<'a> {
    pub label: &'a str,
    pub status: String,
    pub status_style: Style,
    pub hint: &'a str,
    pub hint_style: Style,
}

impl<'a> StatusIndicator<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::raw(format!("{}: ", self.label)),
            Span::styled(self.status.clone(), self.status_style),
            Span::raw("  "),
            Span::styled(self.hint, self.hint_style),
        ]);
        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
