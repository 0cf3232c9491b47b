//! Static charts of the persisted rate table.
//!
//! - data preparation (`series`)
//! - PNG rendering (`png`)

use std::path::PathBuf;

use tracing::{info, warn};

use crate::domain::VizConfig;
use crate::error::AppError;

pub mod png;
pub mod series;

pub use series::*;

/// Render the history, distribution and ranking charts into
/// `config.output_dir`. Returns the paths written.
pub fn render_charts(config: &VizConfig, points: &[RatePoint]) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::new();

    let history = history_series(points);
    let path = config.history_path();
    info!(path = %path.display(), points = history.len(), "rendering rate history");
    png::render_history(&path, &history).map_err(|e| render_error(&path, &*e))?;
    written.push(path);

    let groups = rates_by_category(points);
    let path = config.distribution_path();
    info!(path = %path.display(), categories = groups.len(), "rendering distribution by credit type");
    if groups.is_empty() {
        warn!("no labeled rows; distribution chart skipped");
    } else {
        png::render_distribution(&path, &groups).map_err(|e| render_error(&path, &*e))?;
        written.push(path);
    }

    let top = top_rates(points, config.top_n);
    let path = config.top_rates_path();
    info!(path = %path.display(), n = top.len(), "rendering highest rates");
    if top.is_empty() {
        warn!("not enough data for the highest-rates chart");
    } else {
        png::render_top_rates(&path, &top).map_err(|e| render_error(&path, &*e))?;
        written.push(path);
    }

    Ok(written)
}

fn render_error(path: &std::path::Path, err: &dyn std::error::Error) -> AppError {
    AppError::new(1, format!("Failed to render chart '{}': {err}", path.display()))
}
