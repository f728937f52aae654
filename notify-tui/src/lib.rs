//! notify-tui library exports.

pub mod api_client;
pub mod config;
pub mod error;
pub mod events;
pub mod keys;
pub mod loader;
pub mod logging;
pub mod mount;
pub mod realtime;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
