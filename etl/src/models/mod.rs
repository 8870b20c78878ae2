//! Tabular data model shared by every pipeline stage.
//!
//! - [`Cell`] - a single typed value (null, integer or text)
//! - [`Table`] - ordered column names plus rows of cells

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

// =============================================================================
// Cell
// =============================================================================

/// A single table value.
///
/// Empty CSV fields and unmatched join columns are [`Cell::Null`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to a JSON value (null, number or string).
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Integer(i) => json!(i),
            Cell::Text(s) => json!(s),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

// =============================================================================
// Table
// =============================================================================

/// An in-memory table: column names and rows of equal width.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from column names and rows.
    ///
    /// Rows shorter than the header are padded with nulls, longer rows are
    /// truncated.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Value at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Remove a column and return its values.
    pub fn drop_column(&mut self, name: &str) -> Option<Vec<Cell>> {
        let idx = self.column_index(name)?;
        self.columns.remove(idx);
        Some(self.rows.iter_mut().map(|row| row.remove(idx)).collect())
    }

    /// Append a column.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have exactly one entry per row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Cell>) {
        assert_eq!(
            values.len(),
            self.rows.len(),
            "column length must match the number of rows"
        );
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// True when every non-null cell of the column is an integer.
    pub fn is_integer_column(&self, idx: usize) -> bool {
        self.rows
            .iter()
            .all(|row| matches!(row[idx], Cell::Null | Cell::Integer(_)))
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(Cell::to_json))
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }

    /// Rows sorted by their values, for order-insensitive comparison.
    pub fn sorted_rows(&self) -> Vec<Vec<Cell>> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|row| row.iter().map(sort_key).collect::<Vec<_>>());
        rows
    }
}

fn sort_key(cell: &Cell) -> (u8, i64, String) {
    match cell {
        Cell::Null => (0, 0, String::new()),
        Cell::Integer(i) => (1, *i, String::new()),
        Cell::Text(s) => (2, 0, s.clone()),
    }
}
