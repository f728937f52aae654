//! Live channel task: connect, forward frames, reconnect on drop.
//!
//! One task per mounted widget owns the socket, so a widget never holds two
//! connections. The task stops when its [`ChannelHandle`] is closed, which
//! also cancels a pending reconnect sleep.

use crate::api_client::{WsClient, WsStream};
use crate::events::TuiEvent;
use futures_util::StreamExt;
use notify_core::{ChannelMachine, ConnectionState, NotificationItem, WidgetEvent, WidgetKind};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

const CLOSE_GRACE: Duration = Duration::from_secs(2);

pub struct ChannelHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ChannelHandle {
    /// Stop the channel and wait for the socket to be released. Pending
    /// sends and reconnect sleeps are cancelled; a task still running after
    /// `CLOSE_GRACE` (e.g. a server that never finishes the close handshake)
    /// is aborted.
    pub async fn close(mut self) {
        let _ = self.shutdown.send(true);
        if tokio::time::timeout(CLOSE_GRACE, &mut self.task).await.is_err() {
            warn!("live channel did not stop in time; aborting");
            self.task.abort();
        }
    }

    /// Hard stop without waiting; used when the owner is dropped.
    pub fn abort(&self) {
        let _ = self.shutdown.send(true);
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

enum PumpExit {
    Dropped,
    Shutdown,
}

pub fn spawn_live_channel(
    ws: WsClient,
    kind: WidgetKind,
    epoch: u64,
    sender: mpsc::Sender<TuiEvent>,
) -> ChannelHandle {
    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run_channel(ws, kind, epoch, sender, shutdown_rx));
    ChannelHandle { shutdown, task }
}

async fn run_channel(
    ws: WsClient,
    kind: WidgetKind,
    epoch: u64,
    sender: mpsc::Sender<TuiEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let url = ws.url_for(kind);
    let mut machine = ChannelMachine::new(*ws.retry_policy());
    let mut closed_by_owner = false;

    loop {
        if *shutdown.borrow() {
            closed_by_owner = true;
            break;
        }
        let attempt = match machine.start_connect() {
            Ok(attempt) => attempt,
            Err(err) => {
                warn!(widget = ?kind, error = %err, "refusing to open live channel");
                break;
            }
        };
        debug!(widget = ?kind, %url, attempt, "connecting live channel");
        let connecting = WidgetEvent::ChannelConnecting { attempt };
        if !emit(&sender, &mut shutdown, kind, epoch, connecting).await {
            closed_by_owner = true;
            break;
        }

        let connected = tokio::select! {
            _ = shutdown.changed() => {
                closed_by_owner = true;
                break;
            }
            result = ws.connect(kind) => result,
        };

        match connected {
            Ok(mut stream) => {
                if let Err(err) = machine.opened() {
                    warn!(widget = ?kind, error = %err, "unexpected open");
                }
                info!(widget = ?kind, %url, "live channel connected");
                let exit = if emit(&sender, &mut shutdown, kind, epoch, WidgetEvent::ChannelOpened).await {
                    pump(&mut stream, &mut shutdown, kind, epoch, &sender).await
                } else {
                    PumpExit::Shutdown
                };
                match exit {
                    PumpExit::Shutdown => {
                        let _ = stream.close(None).await;
                        closed_by_owner = true;
                        break;
                    }
                    PumpExit::Dropped => {
                        info!(widget = ?kind, "live channel disconnected");
                    }
                }
            }
            Err(err) => {
                warn!(widget = ?kind, %url, error = %err, "live channel connect failed");
            }
        }
        if !emit(&sender, &mut shutdown, kind, epoch, WidgetEvent::ChannelClosed).await {
            closed_by_owner = true;
            break;
        }

        match machine.dropped() {
            Ok(Some(delay)) => {
                let delay = jittered_backoff(delay, machine.policy().jitter);
                let attempt = match machine.state() {
                    ConnectionState::RetryPending { attempt, .. } => attempt,
                    _ => 0,
                };
                debug!(widget = ?kind, attempt, delay_ms = delay.as_millis() as u64, "reconnect scheduled");
                let scheduled = WidgetEvent::RetryScheduled { attempt, delay };
                if !emit(&sender, &mut shutdown, kind, epoch, scheduled).await {
                    closed_by_owner = true;
                    break;
                }
                tokio::select! {
                    _ = shutdown.changed() => {
                        closed_by_owner = true;
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            Ok(None) => {
                warn!(widget = ?kind, "retry policy exhausted; live channel stays down");
                let _ = emit(&sender, &mut shutdown, kind, epoch, WidgetEvent::ChannelGaveUp).await;
                break;
            }
            Err(err) => {
                warn!(widget = ?kind, error = %err, "channel state error");
                break;
            }
        }
    }

    if closed_by_owner {
        machine.terminate();
        // The owner may have stopped reading; never wait on a full queue here.
        let _ = sender.try_send(TuiEvent::widget(kind, epoch, WidgetEvent::ChannelTerminated));
    }
    debug!(widget = ?kind, state = machine.state().name(), "live channel task finished");
}

/// Send one event unless the owner shuts the channel down first. Returns
/// `false` when the task should stop: shutdown was requested or the
/// receiving side is gone.
async fn emit(
    sender: &mpsc::Sender<TuiEvent>,
    shutdown: &mut watch::Receiver<bool>,
    kind: WidgetKind,
    epoch: u64,
    event: WidgetEvent,
) -> bool {
    if *shutdown.borrow() {
        return false;
    }
    tokio::select! {
        _ = shutdown.changed() => false,
        sent = sender.send(TuiEvent::widget(kind, epoch, event)) => sent.is_ok(),
    }
}

/// Forward text frames until the socket drops or the owner shuts us down.
async fn pump(
    stream: &mut WsStream,
    shutdown: &mut watch::Receiver<bool>,
    kind: WidgetKind,
    epoch: u64,
    sender: &mpsc::Sender<TuiEvent>,
) -> PumpExit {
    loop {
        let message = tokio::select! {
            _ = shutdown.changed() => return PumpExit::Shutdown,
            message = stream.next() => message,
        };
        match message {
            Some(Ok(Message::Text(text))) => match NotificationItem::from_frame(&text) {
                Ok(item) => {
                    if !emit(sender, shutdown, kind, epoch, WidgetEvent::Pushed(item)).await {
                        return PumpExit::Shutdown;
                    }
                }
                Err(err) => {
                    warn!(widget = ?kind, error = %err, "dropping malformed frame");
                }
            },
            Some(Ok(Message::Close(frame))) => {
                debug!(widget = ?kind, ?frame, "server closed live channel");
                return PumpExit::Dropped;
            }
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                warn!(widget = ?kind, error = %err, "live channel error");
                return PumpExit::Dropped;
            }
            None => return PumpExit::Dropped,
        }
    }
}

fn jittered_backoff(base: Duration, jitter: Duration) -> Duration {
    let jitter_ms = jitter.as_millis() as u64;
    if jitter_ms == 0 {
        return base;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_nanos(0))
        .subsec_nanos() as u64;
    base.saturating_add(Duration::from_millis(nanos % jitter_ms))
}
