//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs the log subscriber
//! - parses CLI arguments
//! - dispatches to the ETL or the chart pipeline

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, EtlArgs, VizArgs};
use crate::domain::{EtlConfig, VizConfig};
use crate::error::AppError;

pub mod pipeline;

use pipeline::{EtlStatus, VizStatus};

/// Entry point for the `tibc` binary.
pub fn run() -> Result<(), AppError> {
    // Must run before parsing so `TIBC_*` variables from `.env` act as flag defaults.
    dotenvy::dotenv().ok();
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Etl(args) => handle_etl(args),
        Command::Viz(args) => handle_viz(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// The ETL never fails the process: every stage logs its own failure.
fn handle_etl(args: EtlArgs) -> Result<(), AppError> {
    let config = etl_config_from_args(&args);
    info!(url = %config.source_url, "ETL started");

    match pipeline::run_etl(&config) {
        EtlStatus::Loaded { rows } => info!(
            rows,
            database = %config.database.display(),
            table = %config.table,
            "ETL completed"
        ),
        EtlStatus::NoData => warn!("ETL finished without data to load"),
        EtlStatus::ExtractFailed(e) => warn!(error = %e, "ETL stopped: extraction failed"),
        EtlStatus::LoadFailed(e) => warn!(error = %e, "ETL stopped: load failed"),
    }
    Ok(())
}

fn handle_viz(args: VizArgs) -> Result<(), AppError> {
    let config = viz_config_from_args(&args);
    info!(database = %config.database.display(), "chart generation started");

    match pipeline::run_viz(&config)? {
        VizStatus::Rendered(paths) => {
            for path in &paths {
                info!(path = %path.display(), "chart saved");
            }
            info!(charts = paths.len(), "chart generation completed");
        }
        VizStatus::NoRows => warn!(
            table = %config.table,
            "table is empty; nothing to chart"
        ),
        VizStatus::NoChartableRows => {
            warn!("no rows with both a resolution date and a rate; nothing to chart")
        }
    }
    Ok(())
}

pub fn etl_config_from_args(args: &EtlArgs) -> EtlConfig {
    EtlConfig {
        source_url: args.url.clone(),
        database: args.store.database.clone(),
        table: args.store.table.clone(),
    }
}

pub fn viz_config_from_args(args: &VizArgs) -> VizConfig {
    VizConfig {
        database: args.store.database.clone(),
        table: args.store.table.clone(),
        output_dir: args.out_dir.clone(),
        top_n: args.top,
    }
}

/// Rewrite argv so `tibc` defaults to `tibc etl`.
///
/// Rules:
/// - `tibc`                      -> `tibc etl`
/// - `tibc --url URL ...`        -> `tibc etl --url URL ...`
/// - `tibc --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("etl".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if matches!(arg1.as_str(), "etl" | "viz") {
        return argv;
    }

    // A leading flag is an ETL flag.
    if arg1.starts_with('-') {
        argv.insert(1, "etl".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_etl() {
        assert_eq!(rewrite_args(argv(&["tibc"])), argv(&["tibc", "etl"]));
    }

    #[test]
    fn leading_flag_is_an_etl_flag() {
        assert_eq!(
            rewrite_args(argv(&["tibc", "--table", "t"])),
            argv(&["tibc", "etl", "--table", "t"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        let cases: [&[&str]; 4] = [
            &["tibc", "viz"],
            &["tibc", "etl"],
            &["tibc", "--help"],
            &["tibc", "-V"],
        ];
        for args in cases {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }
}
