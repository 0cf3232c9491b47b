//! Command-line parsing for the TIBC ETL.
//!
//! Every option also reads a `TIBC_*` environment variable, so a `.env` file
//! can configure a run without flags. Defaults live in `domain::config`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_DATABASE, DEFAULT_SOURCE_URL, DEFAULT_TABLE};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tibc", version, about = "Current bank interest rate (TIBC) ETL and charts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the rate CSV, normalize it and replace the database table.
    ///
    /// Failures are logged; the command itself always exits successfully.
    Etl(EtlArgs),
    /// Render the history, distribution and top-rates charts from the database.
    Viz(VizArgs),
}

/// Storage location shared by both subcommands.
#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// SQLite database file.
    #[arg(long, env = "TIBC_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Table holding the rate records.
    #[arg(long, env = "TIBC_TABLE", default_value = DEFAULT_TABLE)]
    pub table: String,
}

#[derive(Debug, Args, Clone)]
pub struct EtlArgs {
    /// CSV resource to download.
    #[arg(long, env = "TIBC_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub url: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args, Clone)]
pub struct VizArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Directory the PNG charts are written into.
    #[arg(long, env = "TIBC_OUTPUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Number of rates in the ranking chart.
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}
