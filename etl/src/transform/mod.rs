//! Transformation module.
//!
//! - Merge: load both CSV sources and outer-join them on `id`
//! - Clean: split `categories` into label columns, drop duplicates
//! - Pipeline: load → clean → save

pub mod clean;
pub mod merge;
pub mod pipeline;

pub use clean::{clean, drop_duplicates, parse_label_token, split_categories};
pub use merge::{load, outer_join};
pub use pipeline::*;
