//! notify-tui entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify_tui::api_client::ApiClient;
use notify_tui::config::TuiConfig;
use notify_tui::error::TuiError;
use notify_tui::events::TuiEvent;
use notify_tui::keys::{map_key, Action};
use notify_tui::logging;
use notify_tui::state::App;
use notify_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    logging::init(&config.log_path)?;

    let policy = config.retry.policy();
    if policy.is_unbounded() {
        warn!(
            interval_ms = config.retry.interval_ms,
            "live channel retries are unbounded; set retry.max_attempts to cap them"
        );
    }

    let api = ApiClient::new(&config)?;
    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    let mut app = App::new(config, api, event_tx.clone());

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    spawn_input_reader(event_tx.clone());
    app.mount_all();
    info!("notify-tui started");

    let tick_rate = Duration::from_millis(app.config.tick_rate_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {}
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, event).await {
                    break;
                }
            }
        }
    }

    app.unmount_all().await;
    info!("notify-tui stopped");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        sender.blocking_send(TuiEvent::Input(key))
                    }
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

/// Returns `true` when the app should exit.
async fn handle_event(app: &mut App, event: TuiEvent) -> bool {
    match event {
        TuiEvent::Input(key) => {
            if let Some(action) = map_key(key) {
                return handle_action(app, action).await;
            }
        }
        TuiEvent::Widget { kind, epoch, event } => {
            app.handle_widget_event(kind, epoch, *event);
        }
        TuiEvent::Resize { .. } => {}
    }
    false
}

async fn handle_action(app: &mut App, action: Action) -> bool {
    match action {
        Action::Quit => return true,
        Action::FocusNext => app.focus_next(),
        Action::FocusPrev => app.focus_previous(),
        Action::MoveDown => app.select_next(),
        Action::MoveUp => app.select_previous(),
        Action::Remount => {
            let focus = app.focus;
            app.remount(focus).await;
        }
    }
    false
}
