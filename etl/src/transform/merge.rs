//! Load both sources and combine them with a full outer join.
//!
//! # Layout
//!
//! ```text
//! messages                 categories                merged
//! ┌────┬─────────┐         ┌────┬────────────┐       ┌────┬─────────┬────────────┐
//! │ id │ message │    +    │ id │ categories │   →   │ id │ message │ categories │
//! └────┴─────────┘         └────┴────────────┘       └────┴─────────┴────────────┘
//! ```
//!
//! Rows keep the messages order, each followed by its matches; categories
//! rows that matched nothing come last. Missing sides are filled with nulls.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::{Cell, Table};
use crate::parser::read_csv;

/// Column both sources are joined on.
pub const JOIN_KEY: &str = "id";

/// Read the messages and categories files and outer-join them on `id`.
pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(messages_path: P, categories_path: Q) -> LoadResult<Table> {
    let messages_path = messages_path.as_ref();
    let categories_path = categories_path.as_ref();

    let messages = read_csv(messages_path)?;
    require_key(&messages, messages_path)?;

    let categories = read_csv(categories_path)?;
    require_key(&categories, categories_path)?;

    let merged = outer_join(&messages, &categories, JOIN_KEY).ok_or_else(|| LoadError::MissingColumn {
        path: messages_path.to_path_buf(),
        column: JOIN_KEY.to_string(),
    })?;
    tracing::info!(
        messages = messages.len(),
        categories = categories.len(),
        merged = merged.len(),
        "merged sources"
    );
    Ok(merged)
}

fn require_key(table: &Table, path: &Path) -> LoadResult<()> {
    if table.has_column(JOIN_KEY) {
        Ok(())
    } else {
        Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: JOIN_KEY.to_string(),
        })
    }
}

/// Full outer join of two tables on `key`.
///
/// Returns `None` if either table lacks the key column. Non-key columns
/// present on both sides are suffixed `_x` (left) and `_y` (right).
/// Integer and text keys with the same rendering match; null keys match
/// each other only.
pub fn outer_join(left: &Table, right: &Table, key: &str) -> Option<Table> {
    let left_key = left.column_index(key)?;
    let right_key = right.column_index(key)?;

    let left_rest: Vec<usize> = (0..left.width()).filter(|&i| i != left_key).collect();
    let right_rest: Vec<usize> = (0..right.width()).filter(|&i| i != right_key).collect();

    let left_names: HashSet<&str> = left_rest.iter().map(|&i| left.columns[i].as_str()).collect();
    let right_names: HashSet<&str> = right_rest.iter().map(|&i| right.columns[i].as_str()).collect();

    let mut columns = vec![key.to_string()];
    for &i in &left_rest {
        let name = &left.columns[i];
        columns.push(if right_names.contains(name.as_str()) {
            format!("{}_x", name)
        } else {
            name.clone()
        });
    }
    for &i in &right_rest {
        let name = &right.columns[i];
        columns.push(if left_names.contains(name.as_str()) {
            format!("{}_y", name)
        } else {
            name.clone()
        });
    }

    let mut right_index: HashMap<Option<String>, Vec<usize>> = HashMap::new();
    for (idx, row) in right.rows.iter().enumerate() {
        right_index.entry(join_key(&row[right_key])).or_default().push(idx);
    }

    let mut rows = Vec::new();
    let mut matched = vec![false; right.len()];

    for left_row in &left.rows {
        let matches = right_index.get(&join_key(&left_row[left_key]));
        match matches {
            Some(indices) => {
                for &r in indices {
                    matched[r] = true;
                    rows.push(join_row(
                        left_row[left_key].clone(),
                        Some(left_row),
                        &left_rest,
                        Some(&right.rows[r]),
                        &right_rest,
                    ));
                }
            }
            None => rows.push(join_row(
                left_row[left_key].clone(),
                Some(left_row),
                &left_rest,
                None,
                &right_rest,
            )),
        }
    }

    for (r, right_row) in right.rows.iter().enumerate() {
        if !matched[r] {
            rows.push(join_row(
                right_row[right_key].clone(),
                None,
                &left_rest,
                Some(right_row),
                &right_rest,
            ));
        }
    }

    Some(Table { columns, rows })
}

/// Keys compare by their text so an integer id matches a textual one.
/// Null keys only match other null keys, never empty text.
fn join_key(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        other => Some(other.to_string()),
    }
}

fn join_row(
    key: Cell,
    left: Option<&Vec<Cell>>,
    left_cols: &[usize],
    right: Option<&Vec<Cell>>,
    right_cols: &[usize],
) -> Vec<Cell> {
    let mut row = Vec::with_capacity(1 + left_cols.len() + right_cols.len());
    row.push(key);
    row.extend(left_cols.iter().map(|&i| left.map_or(Cell::Null, |r| r[i].clone())));
    row.extend(right_cols.iter().map(|&i| right.map_or(Cell::Null, |r| r[i].clone())));
    row
}
