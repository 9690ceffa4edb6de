//! CSV files holding the accumulated dataset.
//!
//! Each journal run merges into two files: the journal's own CSV and the
//! cross-journal aggregate. Writes go to a temporary file in the same
//! directory which is then renamed over the target, so a crash mid-write
//! leaves the previous file intact.

use super::merge;
use crate::error::StoreError;
use crate::models::{Column, JournalProfile, Record, StoreRow};
use crate::utils::slugify;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// File name of the cross-journal aggregate.
pub const AGGREGATE_FILE: &str = "all_journals.csv";

/// Row counts of one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Rows in the file before the merge.
    pub existing: usize,
    /// Rows the merge added.
    pub added: usize,
    /// Rows in the file after the merge.
    pub total: usize,
}

/// Both merges of one journal run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreReport {
    pub journal: MergeOutcome,
    pub aggregate: MergeOutcome,
}

#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `{data_dir}/{publisher}_{journal}.csv`
    pub fn journal_path(&self, profile: &JournalProfile) -> PathBuf {
        self.data_dir.join(format!(
            "{}_{}.csv",
            profile.publisher.id(),
            slugify(&profile.journal_key)
        ))
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.data_dir.join(AGGREGATE_FILE)
    }

    /// Rows currently stored at `path`; a missing file has none.
    pub fn read_rows(path: &Path) -> Result<Vec<StoreRow>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let csv_error = |source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
        reader
            .deserialize()
            .collect::<Result<Vec<StoreRow>, _>>()
            .map_err(csv_error)
    }

    /// Merge `rows` into the file at `path`, deduplicating on every column.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the existing file cannot be parsed or the
    /// merged file cannot be written. The previous file is untouched then.
    #[instrument(level = "info", skip_all, fields(path = %path.display(), rows = rows.len()))]
    pub fn merge_into(&self, path: &Path, rows: &[StoreRow]) -> Result<MergeOutcome, StoreError> {
        let existing = Self::read_rows(path)?;
        let existing_count = existing.len();
        let merged = merge(existing, rows.to_vec(), &Column::ALL);

        write_atomically(path, &merged)?;

        let outcome = MergeOutcome {
            existing: existing_count,
            added: merged.len().saturating_sub(existing_count),
            total: merged.len(),
        };
        info!(
            existing = outcome.existing,
            added = outcome.added,
            total = outcome.total,
            "Merged rows"
        );
        Ok(outcome)
    }

    /// Merge a journal's records into its own file and the aggregate.
    pub fn persist(
        &self,
        profile: &JournalProfile,
        records: &[Record],
    ) -> Result<StoreReport, StoreError> {
        let rows: Vec<StoreRow> = records
            .iter()
            .map(|record| StoreRow::from_record(profile, record))
            .collect();

        let journal = self.merge_into(&self.journal_path(profile), &rows)?;
        let aggregate = self.merge_into(&self.aggregate_path(), &rows)?;
        Ok(StoreReport { journal, aggregate })
    }
}

fn write_atomically(path: &Path, rows: &[StoreRow]) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let tmp_path = path.with_extension("csv.tmp");
    let csv_error = |source| StoreError::Csv {
        path: tmp_path.clone(),
        source,
    };
    let mut writer = csv::Writer::from_path(&tmp_path).map_err(csv_error)?;
    if rows.is_empty() {
        writer
            .write_record(Column::ALL.iter().map(|c| c.header()))
            .map_err(csv_error)?;
    }
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    drop(writer);

    fs::rename(&tmp_path, path).map_err(io_error)?;
    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV");
    Ok(())
}
