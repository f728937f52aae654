//! Event types for the TUI event loop.

use crossterm::event::KeyEvent;
use notify_core::{WidgetEvent, WidgetKind};

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Output of a fetch task or live channel, tagged with the mount epoch
    /// it belongs to.
    Widget {
        kind: WidgetKind,
        epoch: u64,
        event: Box<WidgetEvent>,
    },
}

impl TuiEvent {
    pub fn widget(kind: WidgetKind, epoch: u64, event: WidgetEvent) -> Self {
        TuiEvent::Widget {
            kind,
            epoch,
            event: Box::new(event),
        }
    }
}
