//! Run configuration for the two subcommands.
//!
//! Values are resolved in `app` from CLI flags, which fall back to `TIBC_*`
//! environment variables (`.env` supported), which fall back to the defaults
//! below.

use std::path::PathBuf;

pub const DEFAULT_SOURCE_URL: &str =
    "https://www.datos.gov.co/api/views/pare-7x5i/rows.csv?accessType=DOWNLOAD";
pub const DEFAULT_DATABASE: &str = "tibc_data.db";
pub const DEFAULT_TABLE: &str = "tasas_interes_bancario";

pub const HISTORY_CHART: &str = "tasa_interes_historial.png";
pub const DISTRIBUTION_CHART: &str = "tasa_interes_distribucion_tipo_credito.png";
pub const TOP_RATES_CHART: &str = "top_5_tasas_altas.png";

/// Inputs of `tibc etl`.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub source_url: String,
    pub database: PathBuf,
    pub table: String,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            database: PathBuf::from(DEFAULT_DATABASE),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

/// Inputs of `tibc viz`.
#[derive(Debug, Clone)]
pub struct VizConfig {
    pub database: PathBuf,
    pub table: String,
    /// Directory the three PNG charts are written into.
    pub output_dir: PathBuf,
    /// How many rates the ranking chart shows.
    pub top_n: usize,
}

impl VizConfig {
    pub fn history_path(&self) -> PathBuf {
        self.output_dir.join(HISTORY_CHART)
    }

    pub fn distribution_path(&self) -> PathBuf {
        self.output_dir.join(DISTRIBUTION_CHART)
    }

    pub fn top_rates_path(&self) -> PathBuf {
        self.output_dir.join(TOP_RATES_CHART)
    }
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            table: DEFAULT_TABLE.to_string(),
            output_dir: PathBuf::from("."),
            top_n: 5,
        }
    }
}
