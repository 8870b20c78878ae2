//! SQLite persistence for cleaned tables.
//!
//! Saving always replaces: the target table is dropped, recreated from the
//! in-memory column layout and bulk-inserted inside one transaction.

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

use crate::error::{StoreError, StoreResult};
use crate::models::{Cell, Table};

/// Name of the table written by the pipeline.
pub const TABLE_NAME: &str = "DisasterResponse";

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Cell::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Cell::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

fn cell_from_sql(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Integer(i),
        ValueRef::Real(f) => Cell::Text(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
    }
}

/// Quote an identifier for SQLite.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn open(path: &Path) -> StoreResult<Connection> {
    Connection::open(path).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `table` to [`TABLE_NAME`] in the database at `destination`.
pub fn save<P: AsRef<Path>>(table: &Table, destination: P) -> StoreResult<()> {
    save_as(table, destination, TABLE_NAME)
}

/// Write `table` under `name`, replacing any existing table of that name.
pub fn save_as<P: AsRef<Path>>(table: &Table, destination: P, name: &str) -> StoreResult<()> {
    if table.columns.is_empty() {
        return Err(StoreError::EmptySchema);
    }

    let mut conn = open(destination.as_ref())?;
    let tx = conn.transaction()?;

    let ident = quote_ident(name);
    tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", ident))?;
    tx.execute_batch(&create_table_sql(table, &ident))?;

    {
        let placeholders = vec!["?"; table.width()].join(", ");
        let mut stmt = tx.prepare(&format!("INSERT INTO {} VALUES ({})", ident, placeholders))?;
        for row in &table.rows {
            stmt.execute(params_from_iter(row.iter()))?;
        }
    }

    tx.commit()?;
    tracing::info!(
        table = name,
        rows = table.len(),
        path = %destination.as_ref().display(),
        "saved table"
    );
    Ok(())
}

fn create_table_sql(table: &Table, ident: &str) -> String {
    let columns: Vec<String> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            match column_type(table, idx) {
                Some(ty) => format!("{} {}", quote_ident(col), ty),
                None => quote_ident(col),
            }
        })
        .collect();
    format!("CREATE TABLE {} ({});", ident, columns.join(", "))
}

/// Declared type for a column. Columns mixing integers and text get no
/// type so SQLite stores each value as given.
fn column_type(table: &Table, idx: usize) -> Option<&'static str> {
    let has_int = table.rows.iter().any(|row| matches!(row[idx], Cell::Integer(_)));
    let has_text = table.rows.iter().any(|row| matches!(row[idx], Cell::Text(_)));
    match (has_int, has_text) {
        (true, true) => None,
        (false, true) => Some("TEXT"),
        _ => Some("INTEGER"),
    }
}

/// Read a stored table back into memory, in rowid order.
pub fn read_table<P: AsRef<Path>>(source: P, name: &str) -> StoreResult<Table> {
    let conn = open(source.as_ref())?;
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(name)))?;

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get_ref(i).map(cell_from_sql))
                .collect::<rusqlite::Result<Vec<Cell>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Table { columns, rows })
}
