use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.review-monitor/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.review-monitor/`
/// - `~/.review-monitor/logs/`
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

/// Same as [`ensure_directories`] rooted at `base_dir`.
pub fn ensure_directories_in(base_dir: &Path) -> anyhow::Result<PathBuf> {
    let monitor_dir = base_dir.join(".review-monitor");
    std::fs::create_dir_all(monitor_dir.join("logs"))?;
    Ok(monitor_dir)
}

/// Where log events should go for this run.
///
/// An explicit `--log-file` always wins. The dashboard owns the terminal, so
/// without one it logs to `logs/review-monitor.log` under `monitor_dir`.
/// Other views log to stderr.
pub fn resolve_log_file(
    view: &str,
    explicit: Option<&PathBuf>,
    monitor_dir: &Path,
) -> Option<PathBuf> {
    match (explicit, view) {
        (Some(path), _) => Some(path.clone()),
        (None, "dashboard") => Some(monitor_dir.join("logs").join("review-monitor.log")),
        _ => None,
    }
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map upper-case level names such as `WARNING` onto tracing filter directives.
///
/// Unrecognised names are passed through so `RUST_LOG`-style directives such
/// as `review_data=debug` still work.
pub fn normalise_level(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" | "CRITICAL" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, events are appended to that file without ANSI colours
/// and nothing is written to stderr, which keeps the dashboard screen clean.
/// Otherwise events go to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(normalise_level(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr);
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
