//! The on-disk dataset and the merge that keeps it free of duplicates.
//!
//! # Submodules
//!
//! - [`csv_store`]: per-journal and aggregate CSV files, merged on every run
//! - [`json`]: write-once JSON dump of each journal run
//!
//! # Output Structure
//!
//! ```text
//! data_dir/
//! ├── aea_aer.csv               # one per journal
//! ├── elsevier_jme.csv
//! ├── all_journals.csv          # aggregate of every journal
//! └── runs/
//!     └── 2025-05-06/
//!         ├── aea_aer.json
//!         └── elsevier_jme.json
//! ```
//!
//! # Merge Semantics
//!
//! Existing rows come first, new rows follow in their original order, and
//! any row equal to an earlier one on every key column is dropped. Merging
//! the same scrape twice leaves the file unchanged.

pub mod csv_store;
pub mod json;

use crate::models::{Column, StoreRow};
use itertools::Itertools;

pub use csv_store::{CsvStore, StoreReport};
pub use json::write_run_json;

/// Concatenate `existing` and `new`, keeping the first of any rows that
/// agree on all `key_columns`.
pub fn merge(existing: Vec<StoreRow>, new: Vec<StoreRow>, key_columns: &[Column]) -> Vec<StoreRow> {
    existing
        .into_iter()
        .chain(new)
        .unique_by(|row| {
            key_columns
                .iter()
                .map(|column| row.field(*column).to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}
