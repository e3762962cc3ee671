//! File-based tracing for duprev.
//!
//! A TUI owns the terminal, so tracing output must never reach stdout or
//! stderr while the alternate screen is active. Everything goes to a log file
//! through `tracing-appender`'s non-blocking writer instead. Watch it from a
//! second terminal with `tail -f`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Returns the directory duprev logs into.
///
/// Prefers `$XDG_STATE_HOME/duprev`; falls back to `~/.local/state/duprev`
/// when the env var is absent.
fn log_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_STATE_HOME")
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| std::path::PathBuf::from(h).join(".local").join("state"))
        })
        .unwrap_or_else(|| std::path::PathBuf::from(".state"));
    base.join("duprev")
}

/// Initializes tracing with a non-blocking writer into `duprev.log`.
///
/// The filter comes from `DUPREV_LOG` (same syntax as `RUST_LOG`), defaulting
/// to `info`. Returns the writer guard, which must stay alive until exit so
/// buffered lines are flushed; returns `None` when the log directory cannot
/// be created — the app runs fine without logging.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = std::env::var("DUPREV_LOG").unwrap_or_else(|_| "info".to_owned());
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("duprev: cannot create log directory {:?}: {}", dir, e);
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&dir, "duprev.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(EnvFilter::new(filter))
        .init();

    Some(guard)
}
