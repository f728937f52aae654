//! A widget's mount lifetime: its state, its fetch tasks, its live channel.

use crate::api_client::ApiClient;
use crate::events::TuiEvent;
use crate::loader::spawn_fetches;
use crate::realtime::{spawn_live_channel, ChannelHandle};
use notify_core::{WidgetEvent, WidgetKind, WidgetState};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct MountedWidget {
    pub state: WidgetState,
    /// Highlighted row in the rendered list.
    pub selected: Option<usize>,
    epoch: u64,
    fetches: Vec<JoinHandle<()>>,
    channel: Option<ChannelHandle>,
}

impl MountedWidget {
    /// Start the loader and the live channel. Events they produce carry
    /// `epoch`; anything from an older mount is ignored by [`apply`].
    ///
    /// [`apply`]: MountedWidget::apply
    pub fn mount(
        api: &ApiClient,
        kind: WidgetKind,
        epoch: u64,
        sender: mpsc::Sender<TuiEvent>,
    ) -> Self {
        info!(widget = ?kind, epoch, "mounting widget");
        let fetches = spawn_fetches(api.rest(), kind, epoch, sender.clone());
        let channel = spawn_live_channel(api.ws().clone(), kind, epoch, sender);
        Self {
            state: WidgetState::new(kind),
            selected: None,
            epoch,
            fetches,
            channel: Some(channel),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.state.kind()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_mounted(&self) -> bool {
        self.channel.is_some()
    }

    pub fn apply(&mut self, epoch: u64, event: WidgetEvent) -> bool {
        if epoch != self.epoch {
            debug!(widget = ?self.kind(), epoch, current = self.epoch, "dropping stale event");
            return false;
        }
        let changed = self.state.apply(event);
        if let Some(selected) = self.selected {
            let len = self.state.len();
            self.selected = if len == 0 { None } else { Some(selected.min(len - 1)) };
        }
        changed
    }

    pub fn select_next(&mut self) {
        let len = self.state.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) if index + 1 < len => index + 1,
            Some(index) => index,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.state.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) => index.saturating_sub(1),
            None => 0,
        });
    }

    /// Abort in-flight fetches and close the live channel, cancelling any
    /// pending reconnect. Safe to call twice.
    pub async fn unmount(&mut self) {
        for fetch in self.fetches.drain(..) {
            fetch.abort();
        }
        if let Some(channel) = self.channel.take() {
            channel.close().await;
            info!(widget = ?self.kind(), epoch = self.epoch, "widget unmounted");
        }
    }
}

impl Drop for MountedWidget {
    fn drop(&mut self) {
        for fetch in &self.fetches {
            fetch.abort();
        }
        if let Some(channel) = &self.channel {
            channel.abort();
        }
    }
}
