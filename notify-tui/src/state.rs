//! Application state: the mounted widgets and which one has focus.

use crate::api_client::ApiClient;
use crate::config::TuiConfig;
use crate::events::TuiEvent;
use crate::mount::MountedWidget;
use crate::theme::Theme;
use notify_core::{WidgetEvent, WidgetKind};
use tokio::sync::mpsc;

pub struct App {
    pub config: TuiConfig,
    pub theme: Theme,
    pub api: ApiClient,
    pub widgets: Vec<MountedWidget>,
    pub focus: WidgetKind,
    sender: mpsc::Sender<TuiEvent>,
    next_epoch: u64,
}

impl App {
    pub fn new(config: TuiConfig, api: ApiClient, sender: mpsc::Sender<TuiEvent>) -> Self {
        Self {
            config,
            theme: Theme::dark(),
            api,
            widgets: Vec::new(),
            focus: WidgetKind::Maintenance,
            sender,
            next_epoch: 1,
        }
    }

    /// Mount every widget that is not mounted yet.
    pub fn mount_all(&mut self) {
        for &kind in WidgetKind::all() {
            if self.widget(kind).is_none() {
                let widget = self.mount(kind);
                self.widgets.push(widget);
            }
        }
    }

    /// Unmount `kind` (closing its socket first) and mount it fresh.
    pub async fn remount(&mut self, kind: WidgetKind) {
        match self.widgets.iter().position(|w| w.kind() == kind) {
            Some(index) => {
                self.widgets[index].unmount().await;
                let fresh = self.mount(kind);
                self.widgets[index] = fresh;
            }
            None => {
                let fresh = self.mount(kind);
                self.widgets.push(fresh);
            }
        }
    }

    pub async fn unmount_all(&mut self) {
        for widget in &mut self.widgets {
            widget.unmount().await;
        }
    }

    pub fn widget(&self, kind: WidgetKind) -> Option<&MountedWidget> {
        self.widgets.iter().find(|w| w.kind() == kind)
    }

    pub fn widget_mut(&mut self, kind: WidgetKind) -> Option<&mut MountedWidget> {
        self.widgets.iter_mut().find(|w| w.kind() == kind)
    }

    pub fn focused(&self) -> Option<&MountedWidget> {
        self.widget(self.focus)
    }

    pub fn handle_widget_event(&mut self, kind: WidgetKind, epoch: u64, event: WidgetEvent) -> bool {
        match self.widget_mut(kind) {
            Some(widget) => widget.apply(epoch, event),
            None => false,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = cycle(self.focus, 1);
    }

    pub fn focus_previous(&mut self) {
        self.focus = cycle(self.focus, WidgetKind::all().len() - 1);
    }

    pub fn select_next(&mut self) {
        let focus = self.focus;
        if let Some(widget) = self.widget_mut(focus) {
            widget.select_next();
        }
    }

    pub fn select_previous(&mut self) {
        let focus = self.focus;
        if let Some(widget) = self.widget_mut(focus) {
            widget.select_previous();
        }
    }

    fn mount(&mut self, kind: WidgetKind) -> MountedWidget {
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        MountedWidget::mount(&self.api, kind, epoch, self.sender.clone())
    }
}

fn cycle(current: WidgetKind, step: usize) -> WidgetKind {
    let all = WidgetKind::all();
    let index = all.iter().position(|k| *k == current).unwrap_or(0);
    all[(index + step) % all.len()]
}
