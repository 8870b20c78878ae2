//! Error types for the ETL pipeline.
//!
//! One enum per stage, plus a top-level [`PipelineError`]:
//!
//! - [`LoadError`] - reading and joining the CSV sources
//! - [`CleanError`] - splitting the `categories` column
//! - [`StoreError`] - writing to and reading from SQLite
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Every error reports an [`ErrorKind`] so callers can tell file access
//! problems from malformed data without matching on every variant.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Error Kinds
// =============================================================================

/// Coarse classification shared by every error in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A source could not be read or the destination could not be written.
    FileAccess,
    /// Malformed delimited text, category token or label value.
    Parse,
    /// A row disagrees with the label layout of the first labeled row.
    SchemaAssumptionViolation,
}

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while reading the CSV sources.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to open the file.
    #[error("Cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid CSV content.
    #[error("Invalid CSV in '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header.
    #[error("'{}' has no '{column}' column", .path.display())]
    MissingColumn { path: PathBuf, column: String },
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Io { .. } => ErrorKind::FileAccess,
            LoadError::Csv { source, .. } if source.is_io_error() => ErrorKind::FileAccess,
            LoadError::Csv { .. } | LoadError::MissingColumn { .. } => ErrorKind::Parse,
        }
    }
}

// =============================================================================
// Clean Errors
// =============================================================================

/// Errors while reshaping the `categories` column.
///
/// Row numbers are 0-based positions in the merged table.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The merged table lacks a required column.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A token is not of the form `name-value`.
    #[error("Row {row}: malformed category token '{token}'")]
    MalformedToken { row: usize, token: String },

    /// The suffix after the last `-` is not an integer.
    #[error("Row {row}: label '{label}' has non-integer value '{value}'")]
    InvalidLabelValue {
        row: usize,
        label: String,
        value: String,
    },

    /// The row lists a different number of labels than the first row.
    #[error("Row {row}: expected {expected} category tokens, found {found}")]
    RaggedCategories {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The row names its labels differently than the first row.
    #[error("Row {row}: label {position} is '{found}', expected '{expected}'")]
    LabelMismatch {
        row: usize,
        position: usize,
        expected: String,
        found: String,
    },

    /// A label would create a column name that already exists.
    #[error("Label '{name}' duplicates an existing column")]
    DuplicateColumn { name: String },
}

impl CleanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CleanError::RaggedCategories { .. }
            | CleanError::LabelMismatch { .. }
            | CleanError::DuplicateColumn { .. } => {
                ErrorKind::SchemaAssumptionViolation
            }
            _ => ErrorKind::Parse,
        }
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the SQLite store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened or created.
    #[error("Cannot open database '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Statement failed while writing or reading.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Nothing to create a table from.
    #[error("Cannot store a table without columns")]
    EmptySchema,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::FileAccess
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Clean(#[from] CleanError),

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Load(_) => "loading",
            PipelineError::Clean(_) => "cleaning",
            PipelineError::Store(_) => "saving",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Load(e) => e.kind(),
            PipelineError::Clean(e) => e.kind(),
            PipelineError::Store(e) => e.kind(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for clean operations.
pub type CleanResult<T> = Result<T, CleanError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
