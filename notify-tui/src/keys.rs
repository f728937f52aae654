//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    MoveUp,
    MoveDown,
    /// Tear down the focused widget and mount it again.
    Remount,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Remount),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Remount),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Action::FocusNext),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(Action::FocusPrev),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        _ => None,
    }
}
