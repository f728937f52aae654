//! Per-mount widget state and the events that mutate it.
//!
//! Fetch tasks and the live channel run concurrently and their events can
//! arrive in any order. Every mutation goes through [`WidgetState::apply`],
//! which merges into the latest state rather than overwriting it.

use crate::channel::ConnectionState;
use crate::item::NotificationItem;
use crate::widget::WidgetKind;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    FetchSucceeded {
        slot: usize,
        items: Vec<NotificationItem>,
    },
    FetchFailed {
        slot: usize,
    },
    ChannelConnecting {
        attempt: u32,
    },
    ChannelOpened,
    ChannelClosed,
    RetryScheduled {
        attempt: u32,
        delay: Duration,
    },
    ChannelGaveUp,
    /// The owner closed the channel; no further connection events follow.
    ChannelTerminated,
    Pushed(NotificationItem),
}

#[derive(Debug, Clone)]
pub struct WidgetState {
    kind: WidgetKind,
    /// Pushed items, newest first.
    live: Vec<NotificationItem>,
    /// One slot per resource of `kind`, filled when that fetch succeeds.
    batches: Vec<Option<Vec<NotificationItem>>>,
    settled: Vec<bool>,
    error: Option<String>,
    connected: bool,
    phase: ConnectionState,
    gave_up: bool,
}

impl WidgetState {
    pub fn new(kind: WidgetKind) -> Self {
        let slots = kind.resources().len();
        Self {
            kind,
            live: Vec::new(),
            batches: vec![None; slots],
            settled: vec![false; slots],
            error: None,
            connected: false,
            phase: ConnectionState::Disconnected,
            gave_up: false,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// True until every resource fetch has settled, one way or the other.
    pub fn is_loading(&self) -> bool {
        self.settled.iter().any(|done| !done)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn phase(&self) -> ConnectionState {
        self.phase
    }

    /// The retry policy ran out; nothing reconnects until remount.
    pub fn gave_up(&self) -> bool {
        self.gave_up
    }

    /// Live items newest-first, then fetched batches in resource order.
    pub fn items(&self) -> impl Iterator<Item = &NotificationItem> + '_ {
        self.live
            .iter()
            .chain(self.batches.iter().flatten().flatten())
    }

    pub fn len(&self) -> usize {
        self.live.len() + self.batches.iter().flatten().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply one event. Returns whether anything visible changed.
    pub fn apply(&mut self, event: WidgetEvent) -> bool {
        match event {
            WidgetEvent::FetchSucceeded { slot, items } => {
                if !self.begin_settle(slot) {
                    return false;
                }
                self.batches[slot] = Some(items);
                true
            }
            WidgetEvent::FetchFailed { slot } => {
                if !self.begin_settle(slot) {
                    return false;
                }
                let resource = self.kind.resources()[slot];
                self.error = Some(resource.error_message.to_string());
                true
            }
            WidgetEvent::ChannelConnecting { attempt } => {
                self.gave_up = false;
                self.phase = ConnectionState::Connecting { attempt };
                true
            }
            WidgetEvent::ChannelOpened => {
                self.connected = true;
                self.phase = ConnectionState::Open;
                true
            }
            WidgetEvent::ChannelClosed => {
                self.connected = false;
                self.phase = ConnectionState::Disconnected;
                true
            }
            WidgetEvent::RetryScheduled { attempt, delay } => {
                self.phase = ConnectionState::RetryPending { attempt, delay };
                true
            }
            WidgetEvent::ChannelGaveUp => {
                self.gave_up = true;
                self.connected = false;
                self.phase = ConnectionState::Disconnected;
                true
            }
            WidgetEvent::ChannelTerminated => {
                self.connected = false;
                self.phase = ConnectionState::Terminated;
                true
            }
            WidgetEvent::Pushed(item) => self.push(item),
        }
    }

    fn push(&mut self, item: NotificationItem) -> bool {
        if !self.kind.accepts(&item) {
            return false;
        }
        if self.kind.dedups_pushes() && self.items().any(|held| held.same_notification(&item)) {
            return false;
        }
        self.live.insert(0, item);
        true
    }

    /// Mark `slot` settled. A slot settles once per mount; repeats and
    /// unknown slots are ignored.
    fn begin_settle(&mut self, slot: usize) -> bool {
        match self.settled.get_mut(slot) {
            Some(done) if !*done => {
                *done = true;
                true
            }
            _ => false,
        }
    }
}
