//! Split the `categories` column into integer label columns.
//!
//! ```text
//! categories                          related │ request │ offer
//! "related-1;request-0;offer-0"   →      1    │    0    │   0
//! ```
//!
//! Label names come from the first row that has a `categories` value and
//! every other row must list the same names in the same order. Rows with
//! no categories (messages without labels) get nulls.

use std::collections::HashSet;

use crate::error::{CleanError, CleanResult};
use crate::models::{Cell, Table};

/// Column holding the semicolon-joined label tokens.
pub const CATEGORIES_COLUMN: &str = "categories";

/// Separator between label tokens.
pub const TOKEN_SEPARATOR: char = ';';

/// Separator between a label name and its value (last occurrence wins).
pub const VALUE_SEPARATOR: char = '-';

/// Replace `categories` with one integer column per label and drop
/// duplicate rows.
pub fn clean(mut table: Table) -> CleanResult<Table> {
    let raw = table
        .drop_column(CATEGORIES_COLUMN)
        .ok_or_else(|| CleanError::MissingColumn(CATEGORIES_COLUMN.to_string()))?;

    let (names, values) = expand_categories(&raw)?;
    check_unique_names(&table, &names)?;
    tracing::debug!(labels = names.len(), "derived label columns");

    let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(raw.len()); names.len()];
    for row_values in values {
        match row_values {
            Some(row_values) => {
                for (col, value) in columns.iter_mut().zip(row_values) {
                    col.push(Cell::Integer(value));
                }
            }
            None => columns.iter_mut().for_each(|col| col.push(Cell::Null)),
        }
    }
    for (name, values) in names.into_iter().zip(columns) {
        table.push_column(name, values);
    }

    let (table, removed) = drop_duplicates(table);
    tracing::info!(rows = table.len(), duplicates = removed, "cleaned table");
    Ok(table)
}

/// Label names plus per-row values; `None` for rows without categories.
type Expanded = (Vec<String>, Vec<Option<Vec<i64>>>);

/// Parse every row's categories string against the first row's labels.
fn expand_categories(raw: &[Cell]) -> CleanResult<Expanded> {
    let mut names: Option<Vec<String>> = None;
    let mut values = Vec::with_capacity(raw.len());

    for (row, cell) in raw.iter().enumerate() {
        let text = match cell {
            Cell::Null => {
                values.push(None);
                continue;
            }
            other => other.to_string(),
        };

        let labels = split_categories(&text)
            .map(|token| parse_label_token(row, token))
            .collect::<CleanResult<Vec<_>>>()?;

        if let Some(expected) = names.as_ref() {
            check_layout(row, expected, &labels)?;
        } else {
            names = Some(labels.iter().map(|(n, _)| n.to_string()).collect());
        }
        values.push(Some(labels.into_iter().map(|(_, v)| v).collect()));
    }

    Ok((names.unwrap_or_default(), values))
}

fn check_layout(row: usize, expected: &[String], labels: &[(&str, i64)]) -> CleanResult<()> {
    if labels.len() != expected.len() {
        return Err(CleanError::RaggedCategories {
            row,
            expected: expected.len(),
            found: labels.len(),
        });
    }
    for (position, (want, (got, _))) in expected.iter().zip(labels).enumerate() {
        if want.as_str() != *got {
            return Err(CleanError::LabelMismatch {
                row,
                position,
                expected: want.clone(),
                found: got.to_string(),
            });
        }
    }
    Ok(())
}

/// Label columns must not repeat each other or a column already present.
fn check_unique_names(table: &Table, names: &[String]) -> CleanResult<()> {
    let mut seen: HashSet<&str> = table.columns.iter().map(String::as_str).collect();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(CleanError::DuplicateColumn { name: name.clone() });
        }
    }
    Ok(())
}

/// Split a categories string into its `name-value` tokens.
pub fn split_categories(value: &str) -> impl Iterator<Item = &str> {
    value.split(TOKEN_SEPARATOR)
}

/// Split one `name-value` token at its last `-` and parse the value.
///
/// `row` is only used for error reporting.
pub fn parse_label_token(row: usize, token: &str) -> CleanResult<(&str, i64)> {
    let (name, value) = token
        .rsplit_once(VALUE_SEPARATOR)
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| CleanError::MalformedToken {
            row,
            token: token.to_string(),
        })?;

    let name = name.trim();
    let parsed = value
        .trim()
        .parse::<i64>()
        .map_err(|_| CleanError::InvalidLabelValue {
            row,
            label: name.to_string(),
            value: value.to_string(),
        })?;

    Ok((name, parsed))
}

/// Remove rows identical to an earlier row. Returns the table and the
/// number of rows removed.
pub fn drop_duplicates(mut table: Table) -> (Table, usize) {
    let before = table.len();
    let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(before);
    table.rows.retain(|row| seen.insert(row.clone()));
    let removed = before - table.len();
    (table, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn merged(rows: &[(i64, &str, Option<&str>)]) -> Table {
        Table::from_rows(
            vec!["id".into(), "text".into(), "categories".into()],
            rows.iter()
                .map(|(id, text, cats)| {
                    vec![
                        Cell::Integer(*id),
                        Cell::from(*text),
                        cats.map_or(Cell::Null, Cell::from),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn test_clean_scenario() {
        let table = merged(&[
            (1, "help", Some("related-1;request-0")),
            (2, "food", Some("related-0;request-1")),
        ]);
        let cleaned = clean(table).unwrap();

        assert_eq!(cleaned.columns, vec!["id", "text", "related", "request"]);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.get(0, "related"), Some(&Cell::Integer(1)));
        assert_eq!(cleaned.get(0, "request"), Some(&Cell::Integer(0)));
        assert_eq!(cleaned.get(1, "related"), Some(&Cell::Integer(0)));
        assert_eq!(cleaned.get(1, "request"), Some(&Cell::Integer(1)));
    }

    #[test]
    fn test_duplicates_removed() {
        let table = merged(&[
            (1, "help", Some("related-1")),
            (1, "help", Some("related-1")),
            (2, "food", Some("related-0")),
        ]);
        let cleaned = clean(table).unwrap();

        assert_eq!(cleaned.len(), 2);
        let (again, removed) = drop_duplicates(cleaned.clone());
        assert_eq!(removed, 0);
        assert_eq!(again, cleaned);
    }

    #[test]
    fn test_rows_without_categories_get_nulls() {
        let table = merged(&[(1, "help", None), (2, "food", Some("related-0;request-1"))]);
        let cleaned = clean(table).unwrap();

        assert_eq!(cleaned.get(0, "related"), Some(&Cell::Null));
        assert_eq!(cleaned.get(0, "request"), Some(&Cell::Null));
        assert_eq!(cleaned.get(1, "request"), Some(&Cell::Integer(1)));
    }

    #[test]
    fn test_name_uses_last_dash() {
        let (name, value) = parse_label_token(0, "aid-related-1").unwrap();
        assert_eq!(name, "aid-related");
        assert_eq!(value, 1);
    }

    #[test]
    fn test_missing_dash_is_parse_error() {
        let err = parse_label_token(4, "related").unwrap_err();
        assert!(matches!(err, CleanError::MalformedToken { row: 4, .. }));
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_non_numeric_value() {
        let err = clean(merged(&[(1, "help", Some("related-yes"))])).unwrap_err();
        assert!(matches!(err, CleanError::InvalidLabelValue { .. }));
    }

    #[test]
    fn test_ragged_row_is_schema_violation() {
        let table = merged(&[
            (1, "help", Some("related-1;request-0")),
            (2, "food", Some("related-0")),
        ]);
        let err = clean(table).unwrap_err();

        assert!(matches!(
            err,
            CleanError::RaggedCategories { row: 1, expected: 2, found: 1 }
        ));
        assert_eq!(err.kind(), ErrorKind::SchemaAssumptionViolation);
    }

    #[test]
    fn test_reordered_labels_are_schema_violation() {
        let table = merged(&[
            (1, "help", Some("related-1;request-0")),
            (2, "food", Some("request-1;related-0")),
        ]);
        let err = clean(table).unwrap_err();

        assert!(matches!(err, CleanError::LabelMismatch { row: 1, position: 0, .. }));
    }

    #[test]
    fn test_repeated_label_rejected() {
        let table = merged(&[(1, "help", Some("related-1;related-0"))]);
        let err = clean(table).unwrap_err();

        assert!(matches!(err, CleanError::DuplicateColumn { ref name } if name == "related"));
        assert_eq!(err.kind(), ErrorKind::SchemaAssumptionViolation);
    }

    #[test]
    fn test_label_colliding_with_message_column_rejected() {
        let table = merged(&[(1, "help", Some("text-1;request-0"))]);
        let err = clean(table).unwrap_err();

        assert!(matches!(err, CleanError::DuplicateColumn { ref name } if name == "text"));
    }

    #[test]
    fn test_missing_categories_column() {
        let table = Table::from_rows(vec!["id".into()], vec![vec![Cell::Integer(1)]]);
        assert!(matches!(clean(table), Err(CleanError::MissingColumn(_))));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(vec!["id".into(), "categories".into()]);
        let cleaned = clean(table).unwrap();

        assert_eq!(cleaned.columns, vec!["id"]);
        assert!(cleaned.is_empty());
    }
}
