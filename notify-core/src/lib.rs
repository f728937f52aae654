//! notify-core - widget model for the notify-tui client.
//!
//! Pure data and transition logic. No IO, no async: the TUI crate owns the
//! runtime and feeds events into the types defined here.

pub mod category;
pub mod channel;
pub mod item;
pub mod retry;
pub mod state;
pub mod view;
pub mod widget;

pub use category::{tone_for_category, Tone};
pub use channel::{ChannelError, ChannelMachine, ConnectionState};
pub use item::{ListEnvelope, NotificationItem};
pub use retry::{Backoff, RetryPolicy};
pub use state::{WidgetEvent, WidgetState};
pub use view::{panel_title, ItemRow, WidgetView};
pub use widget::{Resource, WidgetKind};
