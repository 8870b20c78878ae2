//! CSV reader producing typed [`Table`]s.
//!
//! Files are comma-delimited with a header row. Empty fields become
//! [`Cell::Null`]; a column whose non-empty fields all parse as `i64`
//! is stored as integers, everything else stays text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::{Cell, Table};

/// Delimiter used by both input files.
pub const DELIMITER: u8 = b',';

/// Read a CSV file into a table.
pub fn read_csv<P: AsRef<Path>>(path: P) -> LoadResult<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse_csv(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.width(),
        "parsed csv"
    );
    Ok(table)
}

/// Parse CSV from a reader into a table.
///
/// Records with a different field count than the header are rejected.
pub fn parse_csv<R: Read>(reader: R) -> Result<Table, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let integer_columns: Vec<bool> = (0..headers.len())
        .map(|idx| is_integer_column(&raw_rows, idx))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|raw| {
            raw.into_iter()
                .zip(&integer_columns)
                .map(|(value, &as_int)| coerce(value, as_int))
                .collect()
        })
        .collect();

    Ok(Table::from_rows(headers, rows))
}

/// Parse CSV from a string. Convenience for tests and small inputs.
pub fn csv_to_table(csv: &str) -> Result<Table, csv::Error> {
    parse_csv(csv.as_bytes())
}

fn is_integer_column(rows: &[Vec<String>], idx: usize) -> bool {
    let mut seen = false;
    for value in rows.iter().filter_map(|r| r.get(idx)) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if value.parse::<i64>().is_err() {
            return false;
        }
        seen = true;
    }
    seen
}

fn coerce(value: String, as_int: bool) -> Cell {
    if value.is_empty() {
        return Cell::Null;
    }
    if as_int {
        if let Ok(i) = value.trim().parse::<i64>() {
            return Cell::Integer(i);
        }
    }
    Cell::Text(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_csv() {
        let table = csv_to_table("id,message\n1,help\n2,food").unwrap();

        assert_eq!(table.columns, vec!["id", "message"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "id"), Some(&Cell::Integer(1)));
        assert_eq!(table.get(1, "message"), Some(&Cell::from("food")));
    }

    #[test]
    fn test_quoted_values_keep_commas() {
        let csv = "id,message\n1,\"Help, we need water\"\n";
        let table = csv_to_table(csv).unwrap();

        assert_eq!(table.get(0, "message"), Some(&Cell::from("Help, we need water")));
    }

    #[test]
    fn test_empty_fields_are_null() {
        let table = csv_to_table("id,original,genre\n1,,direct\n").unwrap();

        assert_eq!(table.get(0, "original"), Some(&Cell::Null));
        assert_eq!(table.get(0, "genre"), Some(&Cell::from("direct")));
    }

    #[test]
    fn test_mixed_column_stays_text() {
        let table = csv_to_table("id,code\n1,42\n2,abc\n").unwrap();

        assert_eq!(table.get(0, "code"), Some(&Cell::from("42")));
        assert_eq!(table.get(1, "code"), Some(&Cell::from("abc")));
    }

    #[test]
    fn test_ragged_record_is_error() {
        let result = csv_to_table("a,b\n1,2,3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_header_only() {
        let table = csv_to_table("id,categories\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv("/definitely/not/here.csv").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::FileAccess);
        assert!(err.to_string().contains("here.csv"));
    }

    #[test]
    fn test_read_csv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,categories").unwrap();
        writeln!(file, "2,related-1;request-0").unwrap();

        let table = read_csv(file.path()).unwrap();
        assert_eq!(table.get(0, "categories"), Some(&Cell::from("related-1;request-0")));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"id,message\n1,\xff\xfe\n").unwrap();

        let err = read_csv(file.path()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Parse);
    }
}
