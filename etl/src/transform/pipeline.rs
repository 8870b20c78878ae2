//! High-level pipeline API: load, clean, save.
//!
//! # Example
//!
//! ```rust,ignore
//! use disaster_etl::{run, PipelineConfig};
//!
//! let config = PipelineConfig::new(
//!     "disaster_messages.csv",
//!     "disaster_categories.csv",
//!     "DisasterResponse.db",
//! );
//! let report = run(&config)?;
//! println!("Stored {} rows", report.cleaned_rows);
//! ```

use serde::Serialize;
use std::path::PathBuf;

use super::clean::clean;
use super::merge::load;
use crate::error::PipelineResult;
use crate::logs::{self, LogEntry};
use crate::models::Table;
use crate::store::{save_as, TABLE_NAME};

/// Inputs and output of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Messages CSV
    pub messages_path: PathBuf,
    /// Categories CSV
    pub categories_path: PathBuf,
    /// SQLite database to write
    pub database_path: PathBuf,
    /// Table to replace in the database
    pub table_name: String,
}

impl PipelineConfig {
    pub fn new(
        messages_path: impl Into<PathBuf>,
        categories_path: impl Into<PathBuf>,
        database_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            messages_path: messages_path.into(),
            categories_path: categories_path.into(),
            database_path: database_path.into(),
            table_name: TABLE_NAME.to_string(),
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Rows after the outer join
    pub merged_rows: usize,
    /// Rows written to the database
    pub cleaned_rows: usize,
    /// Exact duplicates dropped during cleaning
    pub duplicates_removed: usize,
    /// Label columns derived from `categories`
    pub labels: Vec<String>,
}

/// Run the whole pipeline, printing progress along the way.
pub fn run(config: &PipelineConfig) -> PipelineResult<PipelineReport> {
    run_with(config, logs::log)
}

/// Run the whole pipeline, handing each progress entry to `emit`.
///
/// A successful run emits exactly four steps: loading (with the two
/// input paths), cleaning, saving (with the database path) and done.
pub fn run_with<F: FnMut(LogEntry)>(config: &PipelineConfig, mut emit: F) -> PipelineResult<PipelineReport> {
    emit(LogEntry::info("Loading data..."));
    emit(LogEntry::info(format!("MESSAGES: {}", config.messages_path.display())).with_indent(1));
    emit(LogEntry::info(format!("CATEGORIES: {}", config.categories_path.display())).with_indent(1));
    let merged = load(&config.messages_path, &config.categories_path)?;
    let merged_rows = merged.len();
    let base_columns = merged.width().saturating_sub(1);

    let unlabeled = merged
        .column(super::clean::CATEGORIES_COLUMN)
        .map_or(0, |cells| cells.iter().filter(|c| c.is_null()).count());
    if unlabeled > 0 {
        tracing::warn!(messages = unlabeled, "messages without categories");
    }

    emit(LogEntry::info("Cleaning data..."));
    let cleaned = clean(merged)?;
    let labels = label_columns(&cleaned, base_columns);
    if let Some(first) = cleaned.to_records().first() {
        tracing::debug!(row = %first, "first cleaned row");
    }

    emit(LogEntry::info("Saving data..."));
    emit(LogEntry::info(format!("DATABASE: {}", config.database_path.display())).with_indent(1));
    save_as(&cleaned, &config.database_path, &config.table_name)?;

    emit(LogEntry::success("Cleaned data saved to database!"));

    Ok(PipelineReport {
        merged_rows,
        cleaned_rows: cleaned.len(),
        duplicates_removed: merged_rows - cleaned.len(),
        labels,
    })
}

/// Label columns are appended after the columns that survive cleaning.
fn label_columns(cleaned: &Table, base_columns: usize) -> Vec<String> {
    cleaned.columns.iter().skip(base_columns).cloned().collect()
}
