//! Tabular result shapes at the warehouse boundary.

/// A single table cell as delivered by the warehouse.
///
/// The statement API returns every value as an optional string; the data
/// loader parses numeric-looking strings into `Number` so the reshape code
/// never re-parses.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Numeric view of the cell, parsing `Text` on the fly.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Null => None,
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

/// A wide sales table: one row per time key, one column per product, plus
/// metadata columns (`YEAR`, `MONTH`, ...).
///
/// Invariant: every row has exactly `columns.len()` cells; `WideTable::new`
/// enforces it so downstream indexing can stay unchecked.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl WideTable {
    /// Build a table from pre-normalized column names and rows.
    ///
    /// Ragged rows are a boundary bug, so this panics rather than limping
    /// along with misaligned cells. Callers constructing tables from
    /// untrusted input must pad/validate first (the warehouse loader does).
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        for (idx, row) in rows.iter().enumerate() {
            assert_eq!(
                row.len(),
                columns.len(),
                "row {idx} has {} cells for {} columns",
                row.len(),
                columns.len()
            );
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}

/// Canonical column-name form: trimmed, upper-cased, spaces collapsed to
/// underscores ("Weekday Name" -> "WEEKDAY_NAME").
///
/// Warehouse column names come back verbatim, so every name is normalized
/// once at the boundary before entering the core.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().replace(' ', "_")
}
