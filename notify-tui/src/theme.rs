//! Terminal palette and tone-to-color mapping.

use notify_core::{ConnectionState, Tone};
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub primary: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub green: Color,
    pub blue: Color,
    pub grey: Color,
    pub purple: Color,
    pub orange: Color,
    pub red: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            primary: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            green: Color::Rgb(0, 200, 0),
            blue: Color::Rgb(80, 140, 255),
            grey: Color::Rgb(128, 128, 128),
            purple: Color::Rgb(160, 32, 240),
            orange: Color::Rgb(255, 165, 0),
            red: Color::Rgb(255, 0, 0),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

pub fn tone_color(tone: Tone, theme: &Theme) -> Color {
    match tone {
        Tone::Green => theme.green,
        Tone::Blue => theme.blue,
        Tone::Grey => theme.grey,
        Tone::Purple => theme.purple,
        Tone::Orange => theme.orange,
        Tone::Red => theme.red,
        Tone::Default => theme.text,
    }
}

pub fn connection_color(state: ConnectionState, theme: &Theme) -> Color {
    match state {
        ConnectionState::Open => theme.success,
        ConnectionState::Connecting { .. } | ConnectionState::RetryPending { .. } => theme.warning,
        ConnectionState::Disconnected => theme.error,
        ConnectionState::Terminated => theme.text_dim,
    }
}
