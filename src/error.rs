//! Error types for each stage of the harvest pipeline.
//!
//! Failures are scoped to the smallest unit they affect:
//!
//! | Error | Scope | Handling |
//! |-------|-------|----------|
//! | [`FetchError`] | one URL | logged, URL skipped |
//! | [`ExtractionFailure`] | one paper | logged, record discarded |
//! | [`EnumerateError`] | one journal | journal skipped and reported |
//! | [`StoreError`] | one journal | journal skipped and reported |
//! | [`ConfigError`] | whole run | fatal at startup |
//!
//! Duplicate rows found while merging are not errors; they are dropped.

use crate::profiles::Field;
use std::path::PathBuf;
use thiserror::Error;

/// A page could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Why a paper page produced no record.
#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("required field `{0}` not found")]
    FieldNotFound(Field),

    #[error("no volume number in {0:?}")]
    UnparseableVolumeIssue(String),
}

/// The list of issue pages for a journal could not be produced.
#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("journal {journal} is not supported: {reason}")]
    UnsupportedJournal { journal: String, reason: String },

    #[error("latest volume of {0} is unknown")]
    UnknownLatestVolume(String),

    #[error("could not load issue index: {0}")]
    Index(#[from] FetchError),
}

impl EnumerateError {
    pub fn unsupported(journal: &str, reason: impl Into<String>) -> Self {
        EnumerateError::UnsupportedJournal {
            journal: journal.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("journal {0} is not in the config")]
    UnknownJournal(String),

    /// Rows are keyed by publisher and journal name, so names must be unique.
    #[error("{publisher} journals {first} and {second} share the name {name:?}")]
    DuplicateJournalName {
        publisher: String,
        name: String,
        first: String,
        second: String,
    },
}

/// A single journal run failed as a whole.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Enumerate(#[from] EnumerateError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RunError {
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            RunError::Enumerate(EnumerateError::UnsupportedJournal { .. })
        )
    }
}
