//! The canonical TIBC row and its column names.

use chrono::NaiveDate;

use super::table::{ColumnValues, Table};

pub const RESOLUCION_ID: &str = "resolucion_id";
pub const FECHA_RESOLUCION: &str = "fecha_resolucion";
pub const VIGENCIA_DESDE: &str = "vigencia_desde";
pub const VIGENCIA_HASTA: &str = "vigencia_hasta";
pub const TASA_INTERES_EA: &str = "tasa_interes_ea";
pub const TIPO_CREDITO_NOMBRE: &str = "tipo_credito_nombre";

/// Source header → canonical column name.
pub const SOURCE_COLUMNS: [(&str, &str); 6] = [
    ("RESOLUCION", RESOLUCION_ID),
    ("FECHA_RESOLUCION", FECHA_RESOLUCION),
    ("VIGENCIA_DESDE", VIGENCIA_DESDE),
    ("VIGENCIA_HASTA", VIGENCIA_HASTA),
    ("INTERES_BANCARIO_CORRIENTE", TASA_INTERES_EA),
    ("MODALIDAD", TIPO_CREDITO_NOMBRE),
];

/// One published rate resolution.
///
/// Every field is optional: malformed source values are kept as absent rather
/// than dropping the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateRecord {
    pub resolucion_id: Option<String>,
    pub fecha_resolucion: Option<NaiveDate>,
    pub vigencia_desde: Option<NaiveDate>,
    pub vigencia_hasta: Option<NaiveDate>,
    /// Effective annual rate in percent (`25.2` means 25.2%).
    pub tasa_interes_ea: Option<f64>,
    pub tipo_credito_nombre: Option<String>,
}

impl Table {
    /// Project the canonical columns into records.
    ///
    /// Columns that are missing, or hold a type other than the canonical one
    /// (e.g. a resolution date left as text), project as absent.
    pub fn to_records(&self) -> Vec<RateRecord> {
        let text = |name: &str, row: usize| match self.column(name).map(|c| &c.values) {
            Some(ColumnValues::Text(v)) => v.get(row).cloned().flatten(),
            _ => None,
        };
        let date = |name: &str, row: usize| match self.column(name).map(|c| &c.values) {
            Some(ColumnValues::Date(v)) => v.get(row).copied().flatten(),
            _ => None,
        };
        let float = |name: &str, row: usize| match self.column(name).map(|c| &c.values) {
            Some(ColumnValues::Float(v)) => v.get(row).copied().flatten(),
            _ => None,
        };

        (0..self.row_count())
            .map(|row| RateRecord {
                resolucion_id: text(RESOLUCION_ID, row),
                fecha_resolucion: date(FECHA_RESOLUCION, row),
                vigencia_desde: date(VIGENCIA_DESDE, row),
                vigencia_hasta: date(VIGENCIA_HASTA, row),
                tasa_interes_ea: float(TASA_INTERES_EA, row),
                tipo_credito_nombre: text(TIPO_CREDITO_NOMBRE, row),
            })
            .collect()
    }
}
