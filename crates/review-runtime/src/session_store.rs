//! Holder of the currently committed [`ReviewSession`].
//!
//! A load walks the dated files one at a time, parsing each on the blocking
//! pool and awaiting it before the next one starts. The new session replaces
//! the old one only when every file parsed; otherwise the previous session is
//! kept and the error is recorded.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use review_core::error::{Result, ReviewError};
use review_data::analysis::{ReviewSession, SessionBuilder};
use review_data::reader::{discover_sources, read_source};
use review_data::snapshot::{order_dated_sources, DatedSource};

// ── SessionStore ──────────────────────────────────────────────────────────────

/// Owns the input paths and the last successfully loaded session.
///
/// # Example
/// ```no_run
/// use review_runtime::session_store::SessionStore;
///
/// # async fn run() {
/// let mut store = SessionStore::new(vec!["./exports".into()]);
/// if store.load().await.is_ok() {
///     let session = store.session().unwrap();
///     println!("{} buckets", session.buckets.len());
/// }
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SessionStore {
    paths: Vec<PathBuf>,
    current: Option<Arc<ReviewSession>>,
    last_error: Option<String>,
    last_successful_load: Option<Instant>,
}

impl SessionStore {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            ..Default::default()
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// The committed session, if any load has succeeded.
    pub fn session(&self) -> Option<Arc<ReviewSession>> {
        self.current.clone()
    }

    /// Human-readable description of the last failed load, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_successful_load(&self) -> Option<Instant> {
        self.last_successful_load
    }

    /// Load (or reload) every configured path and commit the result.
    pub async fn load(&mut self) -> Result<Arc<ReviewSession>> {
        match load_session(&self.paths).await {
            Ok(session) => {
                let session = Arc::new(session);
                self.current = Some(Arc::clone(&session));
                self.last_error = None;
                self.last_successful_load = Some(Instant::now());
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "load failed; keeping previous session");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Discover, order and parse `paths` into a fresh session.
///
/// Files are parsed strictly in ascending date order with one await per
/// file; nothing runs in parallel.
pub async fn load_session(paths: &[PathBuf]) -> Result<ReviewSession> {
    let sources = discover_sources(paths)?;
    let files_seen = sources.len();
    let dated = order_dated_sources(sources);
    tracing::debug!(files_seen, dated = dated.len(), "starting load");

    let mut builder = SessionBuilder::new(files_seen, files_seen - dated.len());
    for DatedSource { date, source } in dated {
        let rows = tokio::task::spawn_blocking(move || read_source(&source))
            .await
            .map_err(|e| ReviewError::Other(anyhow::anyhow!("parse task failed: {e}")))??;
        builder.ingest(date, rows);
    }

    Ok(builder.finish())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
