//! SQLite persistence.
//!
//! `sqlx` is async; the rest of the crate is not. Each public operation
//! builds a current-thread Tokio runtime, opens one connection, does its work
//! and closes the connection before returning, on success and on error.

use std::path::Path;

use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};
use tracing::{info, warn};

use crate::domain::{
    ColumnValues, FECHA_RESOLUCION, RESOLUCION_ID, RateRecord, TASA_INTERES_EA,
    TIPO_CREDITO_NOMBRE, Table, VIGENCIA_DESDE, VIGENCIA_HASTA,
};
use crate::error::EtlError;

/// Result of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing to write; no connection was opened.
    Skipped,
    Written { rows: usize },
}

/// Replace `table_name` in the database at `path` with the contents of `table`.
///
/// The table is dropped and recreated inside one transaction, so a failed load
/// leaves the previous contents in place. The file is created if missing.
pub fn replace_table(path: &Path, table_name: &str, table: &Table) -> Result<LoadOutcome, EtlError> {
    if table.is_empty() {
        info!("table is empty; nothing to load");
        return Ok(LoadOutcome::Skipped);
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    block_on(async {
        let mut conn = connect(&options, path).await?;
        let written = write_table(&mut conn, table_name, table).await;
        close(conn).await;
        written
    })??;

    Ok(LoadOutcome::Written {
        rows: table.row_count(),
    })
}

/// Read the canonical columns of every row in `table_name`.
///
/// Columns are cast to text in SQL and re-parsed here, so values stored as
/// dates, timestamps, numbers or text all come back the same way.
pub fn read_rate_records(path: &Path, table_name: &str) -> Result<Vec<RateRecord>, EtlError> {
    if !path.exists() {
        return Err(EtlError::MissingDatabase(path.to_path_buf()));
    }

    let options = SqliteConnectOptions::new().filename(path).read_only(true);

    block_on(async {
        let mut conn = connect(&options, path).await?;
        let rows = fetch_rate_rows(&mut conn, table_name).await;
        close(conn).await;
        rows
    })?
}

fn block_on<F: Future>(future: F) -> Result<F::Output, EtlError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(EtlError::Runtime)?;
    Ok(runtime.block_on(future))
}

async fn connect(options: &SqliteConnectOptions, path: &Path) -> Result<SqliteConnection, EtlError> {
    let conn = options.connect().await?;
    info!(database = %path.display(), "database connection opened");
    Ok(conn)
}

async fn close(conn: SqliteConnection) {
    match conn.close().await {
        Ok(()) => info!("database connection closed"),
        Err(e) => warn!(error = %e, "failed to close database connection cleanly"),
    }
}

async fn write_table(conn: &mut SqliteConnection, table_name: &str, table: &Table) -> Result<(), EtlError> {
    let name = quote_ident(table_name);
    let column_defs: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), sql_type(&c.values)))
        .collect();
    let column_names: Vec<String> = table.columns().iter().map(|c| quote_ident(&c.name)).collect();
    let placeholders = vec!["?"; table.column_count()].join(", ");

    let create = format!("CREATE TABLE {name} ({})", column_defs.join(", "));
    let insert = format!(
        "INSERT INTO {name} ({}) VALUES ({placeholders})",
        column_names.join(", ")
    );

    let mut tx = conn.begin().await?;

    sqlx::query(&format!("DROP TABLE IF EXISTS {name}"))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&create).execute(&mut *tx).await?;

    for row in 0..table.row_count() {
        let mut query = sqlx::query(&insert);
        for column in table.columns() {
            query = match &column.values {
                ColumnValues::Text(v) => query.bind(v[row].clone()),
                ColumnValues::Date(v) => query.bind(v[row]),
                ColumnValues::Float(v) => query.bind(v[row]),
            };
        }
        query.execute(&mut *tx).await?;
    }

    tx.commit().await?;
    info!(table = table_name, rows = table.row_count(), "table replaced");
    Ok(())
}

async fn fetch_rate_rows(conn: &mut SqliteConnection, table_name: &str) -> Result<Vec<RateRecord>, EtlError> {
    let select = format!(
        "SELECT {} FROM {}",
        [
            RESOLUCION_ID,
            FECHA_RESOLUCION,
            VIGENCIA_DESDE,
            VIGENCIA_HASTA,
            TASA_INTERES_EA,
            TIPO_CREDITO_NOMBRE,
        ]
        .iter()
        .map(|c| format!("CAST({0} AS TEXT) AS {0}", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", "),
        quote_ident(table_name)
    );

    let rows = sqlx::query(&select).fetch_all(&mut *conn).await?;
    info!(table = table_name, rows = rows.len(), "rows read");

    rows.iter().map(record_from_row).collect()
}

fn record_from_row(row: &SqliteRow) -> Result<RateRecord, EtlError> {
    let text = |name: &str| -> Result<Option<String>, EtlError> {
        let value: Option<String> = row.try_get(name)?;
        Ok(value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
    };

    Ok(RateRecord {
        resolucion_id: text(RESOLUCION_ID)?,
        fecha_resolucion: text(FECHA_RESOLUCION)?.as_deref().and_then(parse_stored_date),
        vigencia_desde: text(VIGENCIA_DESDE)?.as_deref().and_then(parse_stored_date),
        vigencia_hasta: text(VIGENCIA_HASTA)?.as_deref().and_then(parse_stored_date),
        tasa_interes_ea: text(TASA_INTERES_EA)?
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite()),
        tipo_credito_nombre: text(TIPO_CREDITO_NOMBRE)?,
    })
}

/// Parse a date as it may have been stored: ISO date, ISO timestamp, or the
/// source's `DD/MM/YYYY` when the loader kept the column as text.
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    // Timestamps: keep the date part.
    raw.get(..10)
        .filter(|_| raw.len() > 10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn sql_type(values: &ColumnValues) -> &'static str {
    match values {
        ColumnValues::Text(_) => "TEXT",
        ColumnValues::Date(_) => "DATE",
        ColumnValues::Float(_) => "REAL",
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
