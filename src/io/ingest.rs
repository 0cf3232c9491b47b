//! CSV ingest.
//!
//! Turns a comma-delimited CSV body into a `Table` of text columns. The header
//! row defines the column names; no typing happens here (see `transform`).
//!
//! - header names are trimmed and stripped of a UTF-8 BOM
//! - cells are trimmed; empty cells become absent
//! - a record shorter than the header is padded with absent cells
//! - a record longer than the header is an error

use csv::StringRecord;

use crate::domain::{Column, Table};
use crate::error::EtlError;

/// Parse a CSV body into a table of text columns.
///
/// A header-only body yields an empty table (columns, no rows).
pub fn parse_csv(body: &str) -> Result<Table, EtlError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header_name).collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(EtlError::RaggedRecord {
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        push_record(&mut cells, &record);
    }

    let mut table = Table::new();
    for (name, values) in headers.into_iter().zip(cells) {
        table.push_column(Column::text(name, values))?;
    }
    Ok(table)
}

fn push_record(cells: &mut [Vec<Option<String>>], record: &StringRecord) {
    for (idx, column) in cells.iter_mut().enumerate() {
        let value = record
            .get(idx)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        column.push(value);
    }
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnValues;

    #[test]
    fn parses_header_and_rows_as_text() {
        let body = "RESOLUCION,FECHA_RESOLUCION,MODALIDAD\n\
                    2359,22/12/2014,Consumo y ordinario\n\
                    0528, 26/03/2015 ,Microcrédito\n";

        let table = parse_csv(body).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column_names(),
            vec!["RESOLUCION", "FECHA_RESOLUCION", "MODALIDAD"]
        );
        // Leading zeros survive: identifiers stay opaque text.
        assert_eq!(
            table.column("RESOLUCION").unwrap().values,
            ColumnValues::Text(vec![Some("2359".into()), Some("0528".into())])
        );
        assert_eq!(
            table.column("FECHA_RESOLUCION").unwrap().values,
            ColumnValues::Text(vec![Some("22/12/2014".into()), Some("26/03/2015".into())])
        );
    }

    #[test]
    fn empty_cells_become_absent() {
        let table = parse_csv("A,B\n1,\n,2\n").unwrap();
        assert_eq!(
            table.column("B").unwrap().values,
            ColumnValues::Text(vec![None, Some("2".into())])
        );
        assert_eq!(
            table.null_counts(),
            vec![("A".to_string(), 1), ("B".to_string(), 1)]
        );
    }

    #[test]
    fn strips_bom_from_first_header() {
        let table = parse_csv("\u{feff}RESOLUCION,MODALIDAD\n1,x\n").unwrap();
        assert_eq!(table.column_names(), vec!["RESOLUCION", "MODALIDAD"]);
    }

    #[test]
    fn header_only_body_is_empty_table() {
        let table = parse_csv("RESOLUCION,MODALIDAD\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn long_record_is_an_error() {
        let err = parse_csv("A,B\n1,2\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            EtlError::RaggedRecord {
                line: 3,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn short_record_is_padded_with_absent_cells() {
        let body = "RESOLUCION,FECHA_RESOLUCION,VIGENCIA_DESDE,VIGENCIA_HASTA,INTERES_BANCARIO_CORRIENTE,MODALIDAD\n\
                    2359,22/12/2014,01/01/2015,31/03/2015,19.21%,Consumo\n\
                    0528,26/03/2015,01/04/2015\n";

        let table = parse_csv(body).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column("VIGENCIA_DESDE").unwrap().values,
            ColumnValues::Text(vec![Some("01/01/2015".into()), Some("01/04/2015".into())])
        );
        assert_eq!(
            table.column("MODALIDAD").unwrap().values,
            ColumnValues::Text(vec![Some("Consumo".into()), None])
        );
        assert_eq!(
            table.null_counts(),
            vec![
                ("RESOLUCION".to_string(), 0),
                ("FECHA_RESOLUCION".to_string(), 0),
                ("VIGENCIA_DESDE".to_string(), 0),
                ("VIGENCIA_HASTA".to_string(), 1),
                ("INTERES_BANCARIO_CORRIENTE".to_string(), 1),
                ("MODALIDAD".to_string(), 1),
            ]
        );
    }

    #[test]
    fn quoted_commas_stay_in_one_cell() {
        let table = parse_csv("A,B\n\"12,5%\",x\n").unwrap();
        assert_eq!(
            table.column("A").unwrap().values,
            ColumnValues::Text(vec![Some("12,5%".into())])
        );
    }
}
