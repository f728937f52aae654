mod support;

use notify_core::{ConnectionState, NotificationItem, RetryPolicy, WidgetEvent, WidgetKind, WidgetState};
use notify_tui::api_client::WsClient;
use notify_tui::events::TuiEvent;
use notify_tui::realtime::spawn_live_channel;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use support::{spawn_ws, wait_for, wait_until, WsScript};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

#[tokio::test]
async fn frames_are_forwarded_and_malformed_ones_dropped() {
    let (addr, record) = spawn_ws(WsScript::SendAndHold(vec![
        r#"{"message":"first","notification_type":"announcements"}"#.to_string(),
        "this is not json".to_string(),
        r#"{"notification_type":"no message"}"#.to_string(),
        r#"{"message":"second","notification_type":"Session Ended","id":4}"#.to_string(),
    ]))
    .await;
    let ws = WsClient::with_policy(format!("ws://{}", addr), RetryPolicy::default());
    let (tx, mut rx) = mpsc::channel::<TuiEvent>(64);
    let handle = spawn_live_channel(ws, WidgetKind::Notifications, 7, tx);

    let seen = wait_for(&mut rx, |event| {
        matches!(event, WidgetEvent::Pushed(item) if item.message == "second")
    })
    .await;

    assert_eq!(seen[0], WidgetEvent::ChannelConnecting { attempt: 0 });
    assert_eq!(seen[1], WidgetEvent::ChannelOpened);
    let pushed: Vec<&NotificationItem> = seen
        .iter()
        .filter_map(|event| match event {
            WidgetEvent::Pushed(item) => Some(item),
            _ => None,
        })
        .collect();
    assert_eq!(pushed.len(), 2);
    assert_eq!(pushed[0].message, "first");
    assert_eq!(pushed[1].extra.get("id"), Some(&serde_json::Value::from(4)));

    handle.close().await;
    assert_eq!(record.paths.lock().expect("lock").as_slice(), ["/ws/notification"]);
}

#[tokio::test]
async fn maintenance_socket_keeps_trailing_slash() {
    let (addr, record) = spawn_ws(WsScript::SendAndHold(vec![])).await;
    let ws = WsClient::with_policy(format!("ws://{}/", addr), RetryPolicy::default());
    let (tx, mut rx) = mpsc::channel::<TuiEvent>(64);
    let handle = spawn_live_channel(ws, WidgetKind::Maintenance, 1, tx);

    wait_for(&mut rx, |event| *event == WidgetEvent::ChannelOpened).await;
    handle.close().await;
    assert_eq!(record.paths.lock().expect("lock").as_slice(), ["/ws/notification/"]);
}

#[tokio::test]
async fn reconnects_after_interval_with_one_socket_at_a_time() {
    let interval = Duration::from_millis(200);
    let (addr, record) = spawn_ws(WsScript::CloseImmediately).await;
    let ws = WsClient::with_policy(format!("ws://{}", addr), RetryPolicy::fixed(interval));
    let (tx, mut rx) = mpsc::channel::<TuiEvent>(64);
    let handle = spawn_live_channel(ws, WidgetKind::Notifications, 1, tx);

    let mut opens = 0;
    let seen = wait_for(&mut rx, |event| {
        if *event == WidgetEvent::ChannelOpened {
            opens += 1;
        }
        opens == 3
    })
    .await;
    handle.close().await;

    let retries: Vec<Duration> = seen
        .iter()
        .filter_map(|event| match event {
            WidgetEvent::RetryScheduled { delay, .. } => Some(*delay),
            _ => None,
        })
        .collect();
    assert_eq!(retries, vec![interval, interval]);
    assert!(seen.contains(&WidgetEvent::ChannelClosed));

    let accepted = record.accepted_at.lock().expect("lock").clone();
    assert!(accepted.len() >= 3);
    for pair in accepted.windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= interval);
    }
    assert_eq!(record.max_active.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn close_cancels_pending_reconnect() {
    let (addr, record) = spawn_ws(WsScript::CloseImmediately).await;
    let ws = WsClient::with_policy(
        format!("ws://{}", addr),
        RetryPolicy::fixed(Duration::from_secs(30)),
    );
    let (tx, mut rx) = mpsc::channel::<TuiEvent>(64);
    let handle = spawn_live_channel(ws, WidgetKind::Notifications, 1, tx);

    wait_for(&mut rx, |event| matches!(event, WidgetEvent::RetryScheduled { .. })).await;

    let started = Instant::now();
    handle.close().await;
    assert!(started.elapsed() < Duration::from_secs(1));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(record.accepted(), 1);
}

#[tokio::test]
async fn bounded_policy_gives_up() {
    // Reserve a port and release it so nothing is listening there.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let policy = RetryPolicy::fixed(Duration::from_millis(20)).with_max_attempts(2);
    let ws = WsClient::with_policy(format!("ws://{}", addr), policy);
    let (tx, mut rx) = mpsc::channel::<TuiEvent>(64);
    let handle = spawn_live_channel(ws, WidgetKind::Maintenance, 1, tx);

    let seen = wait_for(&mut rx, |event| *event == WidgetEvent::ChannelGaveUp).await;
    let connects = seen
        .iter()
        .filter(|event| matches!(event, WidgetEvent::ChannelConnecting { .. }))
        .count();
    assert_eq!(connects, 3);
    assert!(!seen.contains(&WidgetEvent::ChannelOpened));

    tokio::time::timeout(Duration::from_secs(1), async {
        while !handle.is_finished() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("channel task should stop after giving up");
    // Giving up is not a shutdown by the owner.
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn closing_an_open_channel_sends_close_frame_and_reports_termination() {
    let (addr, record) = spawn_ws(WsScript::SendAndHold(vec![])).await;
    let ws = WsClient::with_policy(format!("ws://{}", addr), RetryPolicy::default());
    let (tx, mut rx) = mpsc::channel::<TuiEvent>(64);
    let handle = spawn_live_channel(ws, WidgetKind::Notifications, 3, tx);

    let mut state = WidgetState::new(WidgetKind::Notifications);
    for event in wait_for(&mut rx, |event| *event == WidgetEvent::ChannelOpened).await {
        state.apply(event);
    }
    assert!(state.is_connected());

    handle.close().await;
    for event in wait_for(&mut rx, |event| *event == WidgetEvent::ChannelTerminated).await {
        state.apply(event);
    }
    assert!(!state.is_connected());
    assert_eq!(state.phase(), ConnectionState::Terminated);

    wait_until("close frame", || record.close_frames.load(Ordering::SeqCst) == 1).await;
    wait_until("socket released", || record.active() == 0).await;
}

#[tokio::test]
async fn close_does_not_wait_on_a_full_event_queue() {
    let (addr, record) = spawn_ws(WsScript::SendAndHold(vec![
        r#"{"message":"one","notification_type":"x"}"#.to_string(),
        r#"{"message":"two","notification_type":"x"}"#.to_string(),
    ]))
    .await;
    let ws = WsClient::with_policy(format!("ws://{}", addr), RetryPolicy::default());
    // Room for one event and nobody reading: the task blocks on its next send.
    let (tx, mut rx) = mpsc::channel::<TuiEvent>(1);
    let handle = spawn_live_channel(ws, WidgetKind::Notifications, 1, tx);

    wait_until("socket accepted", || record.accepted() == 1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    handle.close().await;
    assert!(started.elapsed() < Duration::from_secs(1));

    wait_until("close frame", || record.close_frames.load(Ordering::SeqCst) == 1).await;
    wait_until("socket released", || record.active() == 0).await;

    // Only the event that fit; nothing was forced in after shutdown.
    let mut buffered = Vec::new();
    while let Ok(TuiEvent::Widget { event, .. }) = rx.try_recv() {
        buffered.push(*event);
    }
    assert_eq!(buffered, vec![WidgetEvent::ChannelConnecting { attempt: 0 }]);
}
