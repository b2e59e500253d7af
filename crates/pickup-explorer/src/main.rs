mod bootstrap;
mod runner;

use std::path::PathBuf;

use anyhow::Result;
use explorer_core::settings::Settings;
use explorer_core::ExplorerError;
use explorer_data::aggregator::MakeAggregator;
use explorer_data::analysis::{analyze_listings, AnalysisOptions};
use explorer_data::views::ScatterBounds;
use explorer_ui::app::{App, ViewMode};
use explorer_ui::dashboard_view::DashboardConfig;
use explorer_ui::table_view;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Pickup Explorer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Match mode: {}, Imputation gaps: {}",
        settings.view,
        settings.theme,
        settings.match_mode,
        settings.on_imputation_gap
    );

    let data_path = bootstrap::discover_data_path(settings.data_path.as_deref()).ok_or_else(|| {
        ExplorerError::DataFileNotFound(PathBuf::from(bootstrap::DEFAULT_DATA_FILE))
    })?;

    let options = AnalysisOptions {
        match_mode: settings.match_mode(),
        gap_policy: settings.gap_policy(),
    };
    let analysis = analyze_listings(&data_path, &options).map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    let view_mode = ViewMode::from_name(&settings.view);
    let source = data_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| data_path.display().to_string());
    let config = DashboardConfig {
        source,
        price_cutoff: settings.price_cutoff,
        minor_price_cutoff: settings.minor_price_cutoff,
        histogram_bins: settings.histogram_bins as usize,
        scatter_bounds: ScatterBounds::default(),
    };
    let app = App::new(&settings.theme, view_mode, config);
    let shutdown = app.shutdown_handle();

    // The TUI loop blocks on terminal input, so it runs on a blocking thread
    // and Ctrl+C delivered as a signal (rather than a key) stops it through
    // the shutdown flag.
    let ui = match view_mode {
        ViewMode::Dashboard => {
            tracing::info!("Opening dashboard over {} pickups", analysis.pickups.len());
            let pickups = analysis.pickups;
            tokio::task::spawn_blocking(move || app.run_dashboard(&pickups))
        }
        ViewMode::Summary => {
            tracing::info!("Running summary view...");
            let summaries = MakeAggregator::summarize(&analysis.pickups);
            let (rows, totals) = table_view::build_rows(&summaries);
            tokio::task::spawn_blocking(move || app.run_table(rows, totals))
        }
    };

    runner::run_until_signal(ui, shutdown, tokio::signal::ctrl_c()).await?;

    Ok(())
}
