//! State to presentation mapping.

use crate::category::{tone_for_category, Tone};
use crate::state::WidgetState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub message: String,
    pub tone: Tone,
}

/// What a widget panel shows. Exactly one variant is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetView {
    Loading(&'static str),
    Error(String),
    Empty(&'static str),
    Items(Vec<ItemRow>),
}

impl WidgetView {
    pub fn from_state(state: &WidgetState) -> Self {
        let kind = state.kind();
        if state.is_loading() {
            return WidgetView::Loading(kind.loading_text());
        }
        if let Some(error) = state.error() {
            return WidgetView::Error(error.to_string());
        }
        if state.is_empty() {
            return WidgetView::Empty(kind.empty_text());
        }
        let rows = state
            .items()
            .map(|item| ItemRow {
                message: item.message.clone(),
                tone: kind
                    .fixed_tone()
                    .unwrap_or_else(|| tone_for_category(&item.notification_type)),
            })
            .collect();
        WidgetView::Items(rows)
    }
}

/// Panel heading, e.g. `Notifications (Live)`.
pub fn panel_title(state: &WidgetState) -> String {
    let status = if state.is_connected() { "Live" } else { "Disconnected" };
    format!("{} ({})", state.kind().title(), status)
}
