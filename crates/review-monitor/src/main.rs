mod bootstrap;

use anyhow::Result;
use review_core::settings::Settings;
use review_runtime::dashboard::{DashboardView, FilterState};
use review_runtime::session_store::SessionStore;
use review_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::resolve();

    let monitor_dir = bootstrap::ensure_directories()?;
    let log_file =
        bootstrap::resolve_log_file(&settings.view, settings.log_file.as_ref(), &monitor_dir);
    bootstrap::setup_logging(&settings.log_level, log_file.as_ref())?;

    tracing::info!("Review Monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Inputs: {}",
        settings.view,
        settings.theme,
        settings.paths.len()
    );

    let mut store = SessionStore::new(settings.paths.clone());
    let loaded = store.load().await;

    let mut filter = FilterState {
        range: None,
        product_filter: settings.product.clone(),
        top_only: settings.top_only,
        drill_date: settings.date,
    };
    let session = store.session().unwrap_or_default();
    filter.apply_bounds(&session, settings.from, settings.to);

    match settings.view.as_str() {
        "json" => {
            // Any load failure is fatal here; there is no screen to report it on.
            let session = loaded?;
            let view = DashboardView::build(&session, &filter);
            if view.is_none() {
                tracing::info!("No review data in the given inputs");
            }
            println!("{}", serde_json::to_string_pretty(&view)?);
        }

        "dashboard" => {
            if let Err(e) = &loaded {
                tracing::warn!("Initial load failed: {}", e);
            }

            let app = App::new(&settings.theme, store, filter);

            // The loop exits on 'q' / Ctrl+C inside the TUI. Also listen for
            // Ctrl+C at the OS level for signals received outside raw mode.
            tokio::select! {
                result = app.run() => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
