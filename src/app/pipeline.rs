//! The ETL and chart workflows, independent of argument parsing.
//!
//! ETL: extract -> (if non-empty) transform -> (if non-empty) load.
//! Every stage failure is logged and ends the run with an `EtlStatus`
//! instead of an error, so a caller can still tell "no data" from "failed".

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::data::CsvSource;
use crate::domain::{EtlConfig, Table, VizConfig};
use crate::error::{AppError, EtlError};
use crate::plot::{chartable_points, render_charts};
use crate::report::{format_head, format_schema, format_shape};
use crate::store::{self, LoadOutcome};
use crate::transform::transform;

const PREVIEW_ROWS: usize = 5;

/// How an ETL run ended.
#[derive(Debug)]
pub enum EtlStatus {
    Loaded { rows: usize },
    /// The source (or the transformed table) had no rows; nothing was stored.
    NoData,
    ExtractFailed(EtlError),
    LoadFailed(EtlError),
}

/// How a chart run ended, when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum VizStatus {
    Rendered(Vec<PathBuf>),
    /// The table exists but holds no rows.
    NoRows,
    /// Every row lacks a resolution date or a rate.
    NoChartableRows,
}

/// Download, normalize and store the rate table.
pub fn run_etl(config: &EtlConfig) -> EtlStatus {
    info!("--- extract ---");
    info!(url = %config.source_url, "downloading CSV");
    let extracted = CsvSource::new().and_then(|source| source.fetch_table(&config.source_url));
    match extracted {
        Ok(raw) => run_etl_with_table(config, raw),
        Err(e) => {
            error!(error = %e, "extraction failed");
            EtlStatus::ExtractFailed(e)
        }
    }
}

/// Transform and load an already extracted table.
pub fn run_etl_with_table(config: &EtlConfig, raw: Table) -> EtlStatus {
    if raw.is_empty() {
        warn!("extracted table is empty; skipping transform and load");
        return EtlStatus::NoData;
    }
    log_preview("extracted", &raw);

    info!("--- transform ---");
    let transformed = transform(raw);
    if transformed.table.is_empty() {
        warn!("transformed table is empty; skipping load");
        return EtlStatus::NoData;
    }
    log_preview("transformed", &transformed.table);

    info!("--- load ---");
    info!(
        database = %config.database.display(),
        table = %config.table,
        "loading table"
    );
    match store::replace_table(&config.database, &config.table, &transformed.table) {
        Ok(LoadOutcome::Written { rows }) => EtlStatus::Loaded { rows },
        Ok(LoadOutcome::Skipped) => EtlStatus::NoData,
        Err(e) => {
            error!(error = %e, "load failed");
            EtlStatus::LoadFailed(e)
        }
    }
}

/// Read the stored table and render the charts.
///
/// A missing database or table, a read error and a render error are fatal.
pub fn run_viz(config: &VizConfig) -> Result<VizStatus, AppError> {
    let records = store::read_rate_records(&config.database, &config.table).map_err(|e| match e {
        EtlError::MissingDatabase(path) => AppError::new(
            1,
            format!(
                "Database '{}' not found. Run `tibc etl` first to create it.",
                path.display()
            ),
        ),
        other => AppError::new(
            1,
            format!(
                "Could not read table '{}' from '{}': {other}",
                config.table,
                config.database.display()
            ),
        ),
    })?;
    info!(rows = records.len(), "rows loaded");

    if records.is_empty() {
        return Ok(VizStatus::NoRows);
    }

    let points = chartable_points(&records);
    info!(
        kept = points.len(),
        dropped = records.len() - points.len(),
        "rows with resolution date and rate"
    );
    if points.is_empty() {
        return Ok(VizStatus::NoChartableRows);
    }

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        AppError::new(
            1,
            format!(
                "Failed to create output directory '{}': {e}",
                config.output_dir.display()
            ),
        )
    })?;

    render_charts(config, &points).map(VizStatus::Rendered)
}

fn log_preview(stage: &str, table: &Table) {
    info!("{stage} data, first {PREVIEW_ROWS} rows:\n{}", format_head(table, PREVIEW_ROWS));
    info!("{stage} shape: {}", format_shape(table));
    info!("{stage} schema:\n{}", format_schema(table));
}
