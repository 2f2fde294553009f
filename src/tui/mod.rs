//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the device
//! screen, and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Request Flow
//!
//! The reducer never performs I/O. When it returns `Effect::SpawnRequest`, the
//! loop runs the provider call on a tokio task and the result comes back over
//! an mpsc channel as `Action::ResponseReady`. The reducer refuses new
//! submissions while one is in flight, so replies always land in order.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: polls every ~80ms so the reply shows up promptly.
//! - **Idle**: sleeps up to 250ms, only redraws on events or terminal resize.

mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::Provider;
use crate::core::action::{Action, Effect, update};
use crate::core::config::{ConfigError, Credentials, ResolvedConfig};
use crate::core::state::ChatSession;
use crate::inference::{CompletionProvider, GeminiProvider, OpenRouterProvider, RequestContext};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    /// Device box size in terminal cells, border included.
    pub columns: u16,
    pub rows: u16,
    /// Lines scrolled up from the newest chat line.
    pub scroll_back: usize,
    /// Chat viewport height from the last frame.
    pub chat_rows: u16,
}

impl TuiState {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            scroll_back: 0,
            chat_rows: rows.saturating_sub(3),
        }
    }

    fn scroll_up(&mut self, lines: usize, session: &ChatSession) {
        let max = session
            .render_model()
            .max_scroll_back(usize::from(self.chat_rows));
        self.scroll_back = (self.scroll_back + lines).min(max);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Mouse capture turns the wheel into scroll events; no text cursor is drawn
        execute!(stdout(), EnableMouseCapture, Hide)?;
        info!("Terminal modes enabled (mouse capture, hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, Show);
    }
}

/// Build a provider from a resolved config.
pub fn build_provider(config: &ResolvedConfig) -> std::io::Result<Arc<dyn CompletionProvider>> {
    let provider: Arc<dyn CompletionProvider> = match config.provider {
        Provider::Gemini => Arc::new(
            GeminiProvider::new(
                config.model_name.clone(),
                Some(config.base_url.clone()),
                config.max_output_tokens,
                Some(config.timeout),
            )
            .map_err(http_client_error)?,
        ),
        Provider::OpenRouter => Arc::new(
            OpenRouterProvider::new(
                config.model_name.clone(),
                Some(config.base_url.clone()),
                config.max_output_tokens,
                Some(config.timeout),
            )
            .map_err(http_client_error)?,
        ),
    };
    Ok(provider)
}

fn http_client_error(e: reqwest::Error) -> std::io::Error {
    std::io::Error::other(format!("failed to build HTTP client: {}", e.without_url()))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let credentials = match Credentials::from_config(&config) {
        Ok(credentials) => credentials,
        Err(e) => {
            warn!("Session not started: {}", e);
            return show_config_error(config.display_columns, config.display_rows, &e);
        }
    };
    info!(
        "Starting session: provider={:?}, model={}, wifi={}",
        config.provider, config.model_name, credentials.wifi_ssid
    );

    let provider = build_provider(&config)?;
    let mut session = ChatSession::from_config(&config, &credentials);
    let mut tui = TuiState::new(config.display_columns, config.display_rows);

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Failed to enable terminal modes: {}", e);
    }

    let result = event_loop(&mut terminal, &mut session, &mut tui, provider);

    drop(terminal_mode_guard);
    ratatui::restore();
    info!("Session ended with {} turns in history", session.history.len());
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    session: &mut ChatSession,
    tui: &mut TuiState,
    provider: Arc<dyn CompletionProvider>,
) -> std::io::Result<()> {
    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, session, tui))?;
            needs_redraw = false;
        }

        let timeout = if session.is_loading {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };

        // Process first event + drain ALL pending events before next draw
        let mut events: Vec<TuiEvent> = poll_event_timeout(timeout)?.into_iter().collect();
        while let Some(event) = poll_event_immediate()? {
            events.push(event);
        }

        let mut should_quit = false;
        for event in events {
            needs_redraw = true;
            let page = usize::from(tui.chat_rows.max(1));
            match event {
                TuiEvent::Resize => {}
                TuiEvent::ForceQuit => {
                    info!("Force quit");
                    should_quit = true;
                }
                TuiEvent::ScrollUp => tui.scroll_up(1, session),
                TuiEvent::ScrollDown => tui.scroll_down(1),
                TuiEvent::ScrollPageUp => tui.scroll_up(page, session),
                TuiEvent::ScrollPageDown => tui.scroll_down(page),
                TuiEvent::ScrollToBottom => tui.scroll_back = 0,
                TuiEvent::Key(key) => match update(session, Action::Key(key)) {
                    Effect::SpawnRequest(request) => {
                        tui.scroll_back = 0;
                        spawn_request(provider.clone(), request, tx.clone());
                    }
                    Effect::Quit => should_quit = true,
                    Effect::Redraw | Effect::None => {}
                },
            }
            if should_quit {
                return Ok(());
            }
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            match update(session, action) {
                Effect::Quit => return Ok(()),
                Effect::SpawnRequest(request) => {
                    spawn_request(provider.clone(), request, tx.clone());
                }
                Effect::Redraw | Effect::None => {}
            }
        }
    }
}

fn spawn_request(
    provider: Arc<dyn CompletionProvider>,
    request: RequestContext,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning {} request ({} history turns)",
        provider.name(),
        request.history.len()
    );
    tokio::spawn(async move {
        let started = std::time::Instant::now();
        let result = provider.complete(request).await;
        debug!(
            "{} request finished in {}ms (ok={})",
            provider.name(),
            started.elapsed().as_millis(),
            result.is_ok()
        );
        if tx.send(Action::ResponseReady(result)).is_err() {
            warn!("Failed to deliver response: receiver dropped");
        }
    });
}

/// Shows the configuration-error screen until a key is pressed.
pub fn show_config_error(columns: u16, rows: u16, error: &ConfigError) -> std::io::Result<()> {
    let mut terminal = ratatui::init();
    let result = wait_on_config_error(&mut terminal, columns, rows, &error.banner());
    ratatui::restore();
    result
}

fn wait_on_config_error(
    terminal: &mut DefaultTerminal,
    columns: u16,
    rows: u16,
    message: &str,
) -> std::io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw_config_error(f, columns, rows, message))?;
        match poll_event_timeout(Duration::from_millis(500))? {
            Some(TuiEvent::Key(_)) | Some(TuiEvent::ForceQuit) => return Ok(()),
            _ => {}
        }
    }
}
