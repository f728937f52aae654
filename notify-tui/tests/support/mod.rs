//! Shared helpers: in-process HTTP and WebSocket servers and event polling.

#![allow(dead_code)]

use axum::Router;
use futures_util::{SinkExt, StreamExt};
use notify_core::{WidgetEvent, WidgetKind};
use notify_tui::config::{RetryConfig, TuiConfig};
use notify_tui::events::TuiEvent;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn retry_config(interval_ms: u64, max_attempts: Option<u32>) -> RetryConfig {
    RetryConfig {
        interval_ms,
        max_attempts,
        multiplier: 1.0,
        max_interval_ms: interval_ms,
        jitter_ms: 0,
    }
}

pub fn test_config(api_base_url: String, ws_base_url: String, retry: RetryConfig) -> TuiConfig {
    TuiConfig {
        api_base_url,
        ws_base_url,
        request_timeout_ms: 2_000,
        tick_rate_ms: 250,
        log_path: "tmp/notify-tui.log".into(),
        retry,
        endpoints: BTreeMap::new(),
    }
}

pub async fn spawn_http(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind http");
    let addr = listener.local_addr().expect("http addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// What the scripted WebSocket server does with each accepted connection.
#[derive(Clone)]
pub enum WsScript {
    /// Send these text frames, then hold the connection open.
    SendAndHold(Vec<String>),
    /// Send a close frame right after the handshake.
    CloseImmediately,
}

#[derive(Default)]
pub struct WsRecord {
    pub accepted_at: Mutex<Vec<Instant>>,
    pub paths: Mutex<Vec<String>>,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    /// Close frames received from the client.
    pub close_frames: AtomicUsize,
}

impl WsRecord {
    pub fn accepted(&self) -> usize {
        self.accepted_at.lock().expect("lock").len()
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

pub async fn spawn_ws(script: WsScript) -> (SocketAddr, Arc<WsRecord>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ws");
    let addr = listener.local_addr().expect("ws addr");
    let record = Arc::new(WsRecord::default());
    let server_record = record.clone();
    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            let record = server_record.clone();
            let script = script.clone();
            tokio::spawn(async move {
                let path_record = record.clone();
                let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                    path_record
                        .paths
                        .lock()
                        .expect("lock")
                        .push(req.uri().path().to_string());
                    Ok(resp)
                };
                let Ok(mut socket) = tokio_tungstenite::accept_hdr_async(tcp, callback).await else {
                    return;
                };
                record.accepted_at.lock().expect("lock").push(Instant::now());
                let now_active = record.active.fetch_add(1, Ordering::SeqCst) + 1;
                record.max_active.fetch_max(now_active, Ordering::SeqCst);

                match script {
                    WsScript::SendAndHold(frames) => {
                        for frame in frames {
                            if socket.send(Message::Text(frame)).await.is_err() {
                                break;
                            }
                        }
                    }
                    WsScript::CloseImmediately => {
                        let _ = socket.close(None).await;
                    }
                }
                while let Some(Ok(message)) = socket.next().await {
                    if message.is_close() {
                        record.close_frames.fetch_add(1, Ordering::SeqCst);
                    }
                }
                record.active.fetch_sub(1, Ordering::SeqCst);
            });
        }
    });
    (addr, record)
}

/// Wait for the next widget event, failing the test after `EVENT_TIMEOUT`.
pub async fn next_widget_event(rx: &mut mpsc::Receiver<TuiEvent>) -> (WidgetKind, u64, WidgetEvent) {
    loop {
        let event = tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
            .await
            .expect("timed out waiting for widget event")
            .expect("event channel closed");
        if let TuiEvent::Widget { kind, epoch, event } = event {
            return (kind, epoch, *event);
        }
    }
}

/// Drain events until one matches `pred`, returning every event seen.
pub async fn wait_for<F>(rx: &mut mpsc::Receiver<TuiEvent>, mut pred: F) -> Vec<WidgetEvent>
where
    F: FnMut(&WidgetEvent) -> bool,
{
    let mut seen = Vec::new();
    loop {
        let (_, _, event) = next_widget_event(rx).await;
        let done = pred(&event);
        seen.push(event);
        if done {
            return seen;
        }
    }
}

/// Poll `cond` until it holds, failing the test after `EVENT_TIMEOUT`.
pub async fn wait_until<F>(what: &str, mut cond: F)
where
    F: FnMut() -> bool,
{
    let reached = tokio::time::timeout(EVENT_TIMEOUT, async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(reached.is_ok(), "timed out waiting for {}", what);
}
