//! In-memory tabular data.
//!
//! A `Table` is an ordered list of named, typed columns of nullable cells.
//! Every stage of the ETL pipeline passes one of these along:
//!
//! - the extractor produces text columns straight from the CSV
//! - the transformer renames columns and converts some of them to dates/floats
//! - the loader maps each column type onto a SQL column type

use chrono::NaiveDate;

/// Cell storage for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Text(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
    Float(Vec<Option<f64>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Date(v) => v.len(),
            Self::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            Self::Text(v) => v.iter().filter(|c| c.is_none()).count(),
            Self::Date(v) => v.iter().filter(|c| c.is_none()).count(),
            Self::Float(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Short type label used in schema summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Float(_) => "float",
        }
    }

    /// Render one cell for previews. Absent cells render as `null`.
    pub fn display_cell(&self, row: usize) -> String {
        let rendered = match self {
            Self::Text(v) => v.get(row).cloned().flatten(),
            Self::Date(v) => v.get(row).copied().flatten().map(|d| d.to_string()),
            Self::Float(v) => v.get(row).copied().flatten().map(|f| f.to_string()),
        };
        rendered.unwrap_or_else(|| "null".to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnValues::Text(values))
    }
}

/// Returned when a column's length does not match the table's row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthMismatch {
    pub column: String,
    pub expected: usize,
    pub found: usize,
}

impl std::fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "column '{}' has {} rows, table has {}",
            self.column, self.found, self.expected
        )
    }
}

impl std::error::Error for LengthMismatch {}

/// Ordered set of equally long columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(&mut self, column: Column) -> Result<(), LengthMismatch> {
        if let Some(first) = self.columns.first() {
            let expected = first.values.len();
            let found = column.values.len();
            if expected != found {
                return Err(LengthMismatch {
                    column: column.name,
                    expected,
                    found,
                });
            }
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// A table with no columns or no rows carries no data.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.row_count() == 0
    }

    /// Rename columns by `(from, to)` pairs. Names not listed are kept.
    pub fn rename_columns(&mut self, mapping: &[(&str, &str)]) {
        for column in &mut self.columns {
            if let Some((_, to)) = mapping.iter().find(|(from, _)| *from == column.name) {
                column.name = (*to).to_string();
            }
        }
    }

    /// Absent-cell count per column, in column order.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.values.null_count()))
            .collect()
    }
}
