//! Formatted terminal previews of a `Table`.
//!
//! Formatting lives here so the pipeline only decides *when* to show a
//! preview, not how it looks.

use crate::domain::Table;

/// Cells wider than this are cut with `…` in previews.
const MAX_CELL_WIDTH: usize = 28;

/// The first `n` rows as an aligned text grid, header included.
pub fn format_head(table: &Table, n: usize) -> String {
    let rows = n.min(table.row_count());

    let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows + 1);
    grid.push(table.column_names().iter().map(|s| truncate(s)).collect());
    for row in 0..rows {
        grid.push(
            table
                .columns()
                .iter()
                .map(|c| truncate(&c.values.display_cell(row)))
                .collect(),
        );
    }

    let widths: Vec<usize> = (0..table.column_count())
        .map(|col| grid.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for (i, line) in grid.iter().enumerate() {
        let label = if i == 0 { String::new() } else { (i - 1).to_string() };
        out.push_str(&format!("{label:>4}"));
        for (cell, &width) in line.iter().zip(&widths) {
            out.push_str(&format!("  {cell:<width$}"));
        }
        out.push('\n');
    }
    out
}

/// `(rows, columns)` in the style `rows x columns`.
pub fn format_shape(table: &Table) -> String {
    format!("{} rows x {} columns", table.row_count(), table.column_count())
}

/// One line per column: position, name, non-null count and cell type.
pub fn format_schema(table: &Table) -> String {
    let rows = table.row_count();
    let name_width = table
        .column_names()
        .iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .max("column".len());

    let mut out = format!(
        "{:>3}  {:<name_width$}  {:>14}  {}\n",
        "#", "column", "non-null", "type"
    );
    for (i, column) in table.columns().iter().enumerate() {
        let non_null = rows - column.values.null_count();
        out.push_str(&format!(
            "{i:>3}  {:<name_width$}  {:>14}  {}\n",
            column.name,
            format!("{non_null}/{rows}"),
            column.values.kind()
        ));
    }
    out
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}
