//! Schema normalization and type coercion.
//!
//! Two coercion policies coexist on purpose:
//!
//! - **strict** (`fecha_resolucion`): all present values must parse as
//!   `DD/MM/YYYY`, otherwise the column is left as text for every row
//! - **permissive** (`vigencia_desde`, `vigencia_hasta`, `tasa_interes_ea`):
//!   a value that does not parse becomes absent
//!
//! No row is ever dropped here.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{
    ColumnValues, FECHA_RESOLUCION, SOURCE_COLUMNS, TASA_INTERES_EA, Table, VIGENCIA_DESDE,
    VIGENCIA_HASTA,
};

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Absent-cell count per column after transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullReport {
    pub counts: Vec<(String, usize)>,
}

impl NullReport {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, column: &str) -> Option<usize> {
        self.counts.iter().find(|(name, _)| name == column).map(|(_, n)| *n)
    }
}

#[derive(Debug, Clone)]
pub struct Transformed {
    pub table: Table,
    pub nulls: NullReport,
    /// Whether `fecha_resolucion` was converted to dates.
    pub resolution_date_parsed: bool,
}

/// Rename and type the raw extractor table.
///
/// An empty input short-circuits to an empty output.
pub fn transform(raw: Table) -> Transformed {
    if raw.is_empty() {
        info!("input table is empty; skipping transformation");
        return Transformed {
            table: Table::new(),
            nulls: NullReport { counts: Vec::new() },
            resolution_date_parsed: false,
        };
    }

    let mut table = raw;
    table.rename_columns(&SOURCE_COLUMNS);
    info!("columns renamed");

    let resolution_date_parsed = convert_strict_date(&mut table, FECHA_RESOLUCION);
    convert_lenient_date(&mut table, VIGENCIA_DESDE);
    convert_lenient_date(&mut table, VIGENCIA_HASTA);
    convert_rate(&mut table, TASA_INTERES_EA);

    let nulls = NullReport {
        counts: table.null_counts(),
    };
    log_nulls(&nulls);

    Transformed {
        table,
        nulls,
        resolution_date_parsed,
    }
}

/// All-or-nothing date conversion. Returns whether the column was converted.
fn convert_strict_date(table: &mut Table, name: &str) -> bool {
    let Some(column) = table.column_mut(name) else {
        warn!(column = name, "column not found; left unconverted");
        return false;
    };
    let ColumnValues::Text(values) = &column.values else {
        warn!(column = name, kind = column.values.kind(), "column is not text; left unconverted");
        return false;
    };

    let mut parsed = Vec::with_capacity(values.len());
    for (row, value) in values.iter().enumerate() {
        match value.as_deref().map(parse_date) {
            None => parsed.push(None),
            Some(Some(date)) => parsed.push(Some(date)),
            Some(None) => {
                warn!(
                    column = name,
                    row,
                    value = value.as_deref().unwrap_or_default(),
                    "value does not match DD/MM/YYYY; column kept as text"
                );
                return false;
            }
        }
    }

    column.values = ColumnValues::Date(parsed);
    info!(column = name, "converted to date");
    true
}

fn convert_lenient_date(table: &mut Table, name: &str) {
    let Some(column) = table.column_mut(name) else {
        warn!(column = name, "column not found; left unconverted");
        return;
    };
    let ColumnValues::Text(values) = &column.values else {
        warn!(column = name, kind = column.values.kind(), "column is not text; left unconverted");
        return;
    };

    let parsed = values
        .iter()
        .map(|v| v.as_deref().and_then(parse_date))
        .collect();
    column.values = ColumnValues::Date(parsed);
    info!(column = name, "converted to date (invalid values set to null)");
}

fn convert_rate(table: &mut Table, name: &str) {
    let Some(column) = table.column_mut(name) else {
        warn!(column = name, "column not found; left unconverted");
        return;
    };
    let ColumnValues::Text(values) = &column.values else {
        warn!(column = name, kind = column.values.kind(), "column is not text; left unconverted");
        return;
    };

    let parsed = values
        .iter()
        .map(|v| v.as_deref().and_then(parse_rate))
        .collect();
    column.values = ColumnValues::Float(parsed);
    info!(column = name, "converted to number (without '%')");
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parse a percentage such as `"19.21%"` or `"19,21 %"` into `19.21`.
pub fn parse_rate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    if number.is_empty() {
        return None;
    }

    // A lone comma is a decimal separator; with a dot present it is ambiguous.
    let normalized = if number.contains(',') && !number.contains('.') {
        number.replacen(',', ".", 1)
    } else {
        number.to_string()
    };

    let v = normalized.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn log_nulls(nulls: &NullReport) {
    if nulls.total() == 0 {
        info!("no null values after transformation");
        return;
    }
    warn!(total = nulls.total(), "null values found after transformation");
    for (column, count) in &nulls.counts {
        info!("  {column:<24} {count}");
    }
}
