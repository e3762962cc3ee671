//! duprev — duplicate file cleanup dashboard TUI.
//!
//! Entry point for the `duprev` binary. Wires together the terminal
//! lifecycle (`tui`), unified event bus (`event`), the dashboard renderer
//! (`ui`), the theme system (`theme`), and the API worker that owns the
//! `duprev-core` HTTP client.
//!
//! # Startup sequence (order matters)
//!
//! 1. Config, logging, theme — read-only, safe before terminal init.
//! 2. Build the API client. A bad base URL must fail here, while error
//!    messages still print normally.
//! 3. `install_panic_hook()` — installed first so it is the innermost hook.
//!    Restores the terminal before the panic message prints.
//! 4. `register_sigterm()` — returns `Arc<AtomicBool>` polled in the event loop.
//! 5. `init_tui()` — enters alternate screen and enables raw mode.
//! 6. Spawn the event task and the API worker, then probe the session.
//!
//! # Safety
//!
//! The event loop exits only via `break` — even draw errors break rather
//! than `?` — so `restore_tui()` at the single exit point covers normal
//! quit, SIGTERM, draw failure, and channel close. The panic hook covers
//! unexpected panics.

mod api;
mod app;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::info;

use crate::api::types::ApiRequest;
use crate::ui::keybindings::{self, KeyAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Step 0: config, logging, theme — read-only, safe before terminal init.
    let config = config::load();
    let _log_guard = logging::init();
    let theme = theme::Theme::from_name(&config.theme);

    // Step 1: the client validates the base URL up front.
    let client = duprev_core::client::ApiClient::new(&config.base_url)
        .with_context(|| format!("invalid backend base url {:?}", config.base_url))?;

    // The floor keeps a mistyped poll interval from hammering the backend.
    let poll_interval = Duration::from_millis(config.poll_interval_ms.max(250));
    let mut state = app::AppState::new(poll_interval, client.base_url().to_owned());

    info!(backend = %client.base_url(), "starting duprev");

    // Step 2: panic hook installed first — innermost hook restores terminal.
    tui::install_panic_hook();

    // Step 3: SIGTERM flag — polled in the 50ms heartbeat arm below.
    let term_flag = tui::register_sigterm();

    // Step 4: enter alternate screen and raw mode.
    let mut terminal = tui::init_tui()?;

    // Step 5: create the event channel and spawn the background event task.
    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    // Step 6: API worker with its request channel, then the session probe
    // that decides between the login screen and the dashboard.
    let (api_tx, api_rx) = tokio::sync::mpsc::unbounded_channel();
    api::worker::spawn_api_worker(client, api_rx, handler.tx.clone());
    state.api_tx = Some(api_tx);
    state.request(ApiRequest::CurrentUser);

    let mut draw_error: Option<std::io::Error> = None;

    // Event loop — exits only via `break`, never via `?`.
    // This guarantees `restore_tui()` is always reached after the loop.
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: guarantees SIGTERM is checked at least every 50ms,
            // even when no crossterm/tick/render events arrive.
            // Without this arm, a quiescent terminal blocks forever in rx.recv()
            // and the SIGTERM flag is never polled.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        // Exactly one draw() call per Render event — never
                        // elsewhere. A failed draw breaks instead of using `?`
                        // so the terminal is restored before the error prints.
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            draw_error = Some(e);
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Key(key)) => {
                        if keybindings::handle_key(key, &mut state, Instant::now()) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Mouse(mouse)) => {
                        if keybindings::handle_mouse(mouse, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Tick) => {
                        state.tick(Instant::now());
                    }
                    Some(event::AppEvent::Api(outcome)) => {
                        state.apply_api_outcome(*outcome, Instant::now());
                    }
                    Some(event::AppEvent::Resize(_, _)) => {
                        // Handled automatically by ratatui on the next Render:
                        // frame.area() returns the new terminal size.
                    }
                    Some(event::AppEvent::Quit) | None => break 'event_loop,
                }
                // Check SIGTERM after every event too, not just on the heartbeat,
                // so quit latency is at most one event cycle rather than 50ms.
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    // Restore the terminal at the single exit point of the loop.
    // Covers normal quit, SIGTERM, draw failure, and channel close. The
    // panic hook handles the panic path separately.
    tui::restore_tui()?;

    if let Some(e) = draw_error {
        return Err(e).context("terminal draw failed");
    }
    info!("clean shutdown");
    Ok(())
}
