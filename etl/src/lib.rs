//! # disaster-etl - merge, clean and store disaster response messages
//!
//! Reads a messages CSV and a categories CSV, joins them on `id`, turns the
//! `categories` string into one integer column per label and replaces a
//! table in a SQLite database with the result.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ messages.csv │──┐  │   Loader    │     │   Cleaner   │     │  Persister  │
//! └──────────────┘  ├─▶│ (outer join)│────▶│ (labels +   │────▶│  (SQLite,   │
//! ┌──────────────┐  │  │             │     │  dedup)     │     │  replace)   │
//! │categories.csv│──┘  └─────────────┘     └─────────────┘     └─────────────┘
//! └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use disaster_etl::{clean, load, save};
//!
//! let merged = load("disaster_messages.csv", "disaster_categories.csv")?;
//! let cleaned = clean(merged)?;
//! save(&cleaned, "DisasterResponse.db")?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - `Table` and `Cell`
//! - [`parser`] - CSV reading with integer coercion
//! - [`transform`] - Join, cleaning and the pipeline
//! - [`store`] - SQLite persistence
//! - [`logs`] - Console progress messages

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Persistence
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{
    CleanError, ErrorKind, LoadError, PipelineError, PipelineResult, StoreError,
};

pub use logs::{LogEntry, LogLevel};

pub use models::{Cell, Table};

pub use parser::{csv_to_table, parse_csv, read_csv};

pub use transform::{
    clean, drop_duplicates, load, outer_join, parse_label_token, run, run_with,
    split_categories,
    PipelineConfig, PipelineReport,
};

pub use store::{read_table, save, save_as, TABLE_NAME};
