//! Data models for journals, issues, papers and the rows they become.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Publisher`] and [`JournalProfile`]: which journal a run targets
//! - [`IssueRef`]: one volume/issue listing page to visit
//! - [`PaperLink`]: one article landing page
//! - [`Record`]: the normalized metadata extracted from a paper page
//! - [`StoreRow`] and [`RawPaper`]: the persisted CSV and JSON shapes
//!
//! The CSV columns use the `Journal_Website, Journal_Name, ...` header
//! expected by the downstream dataset, hence the serde renames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A publisher family with its own page structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Publisher {
    Elsevier,
    Wiley,
    Oxford,
    Springer,
    Aea,
    Jstor,
    Econometrica,
    #[serde(alias = "chicago")]
    UChicago,
}

impl Publisher {
    pub const ALL: [Publisher; 8] = [
        Publisher::Elsevier,
        Publisher::Wiley,
        Publisher::Oxford,
        Publisher::Springer,
        Publisher::Aea,
        Publisher::Jstor,
        Publisher::Econometrica,
        Publisher::UChicago,
    ];

    /// Stable lowercase slug, used in file names and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Publisher::Elsevier => "elsevier",
            Publisher::Wiley => "wiley",
            Publisher::Oxford => "oxford",
            Publisher::Springer => "springer",
            Publisher::Aea => "aea",
            Publisher::Jstor => "jstor",
            Publisher::Econometrica => "econometrica",
            Publisher::UChicago => "uchicago",
        }
    }

    /// Value written to the `Journal_Website` column.
    pub fn display_name(&self) -> &'static str {
        match self {
            Publisher::Elsevier => "Elsevier",
            Publisher::Wiley => "Wiley",
            Publisher::Oxford => "Oxford",
            Publisher::Springer => "Springer",
            Publisher::Aea => "American Economic Association",
            Publisher::Jstor => "JSTOR",
            Publisher::Econometrica => "Econometrica",
            Publisher::UChicago => "UChicago",
        }
    }

    /// Parse a user-supplied publisher name, ignoring case and spaces.
    pub fn from_name(name: &str) -> Option<Publisher> {
        let name = name.to_lowercase().replace(' ', "");
        match name.as_str() {
            "americaneconomicassociation" | "americaneconomicjournal" => Some(Publisher::Aea),
            "chicago" => Some(Publisher::UChicago),
            _ => Publisher::ALL.into_iter().find(|p| p.id() == name),
        }
    }
}

impl fmt::Display for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How a journal subdivides its volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLayout {
    /// Issues `1..=n` in every volume.
    PerVolume(u32),
    /// One listing page per volume, no issue numbers.
    Unsubdivided,
    /// Issue numbers keep counting across volumes; no URL scheme exists.
    NonResetting,
}

/// Identifies one journal of one publisher for a single run.
///
/// Immutable once the run starts; `latest_volume` is either pinned in the
/// config or looked up from the journal's landing page before enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalProfile {
    pub publisher: Publisher,
    /// Key the journal is configured under.
    pub journal_key: String,
    /// Slug or internal numeric id substituted into URL templates.
    pub url_key: String,
    /// Value written to the `Journal_Name` column.
    pub display_name: String,
    pub issue_layout: IssueLayout,
    pub latest_volume: Option<u32>,
}

impl JournalProfile {
    pub fn with_latest_volume(&self, volume: u32) -> Self {
        Self {
            latest_volume: Some(volume),
            ..self.clone()
        }
    }

    /// `publisher/journal` label for logs and reports.
    pub fn label(&self) -> String {
        format!("{}/{}", self.publisher.id(), self.journal_key)
    }
}

/// One issue listing page: a volume and, when the journal has them, an issue.
///
/// Orders by volume, then issue, which is the order publishers number
/// their listing URLs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IssueRef {
    pub volume: u32,
    pub issue: Option<u32>,
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            Some(issue) => write!(f, "Volume {}, Issue {}", self.volume, issue),
            None => write!(f, "Volume {}", self.volume),
        }
    }
}

/// Absolute URL of one article's landing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaperLink(pub String);

impl PaperLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized metadata extracted from a single paper page.
///
/// Every field except `metrics` is required and non-empty; a page missing
/// any of them yields no record at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Canonical `"Volume {V}, Issue {I}"`.
    pub volume_issue: String,
    pub title: String,
    /// Author names joined with `", "`.
    pub authors: String,
    pub abstract_text: String,
    /// Citation count, when the publisher shows one.
    pub metrics: Option<String>,
}

/// Per-run JSON element: `[volume_issue, [title, authors, abstract]]`.
///
/// A fourth inner element carries `metrics` when the record has one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawPaper(pub String, pub Vec<String>);

impl From<&Record> for RawPaper {
    fn from(record: &Record) -> Self {
        let mut details = vec![
            record.title.clone(),
            record.authors.clone(),
            record.abstract_text.clone(),
        ];
        if let Some(metrics) = &record.metrics {
            details.push(metrics.clone());
        }
        RawPaper(record.volume_issue.clone(), details)
    }
}

/// A column of the persisted CSV dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    JournalWebsite,
    JournalName,
    VolumeIssue,
    Title,
    Authors,
    Abstract,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::JournalWebsite,
        Column::JournalName,
        Column::VolumeIssue,
        Column::Title,
        Column::Authors,
        Column::Abstract,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::JournalWebsite => "Journal_Website",
            Column::JournalName => "Journal_Name",
            Column::VolumeIssue => "Volume_Issue",
            Column::Title => "Title",
            Column::Authors => "Authors",
            Column::Abstract => "Abstract",
        }
    }
}

/// One row of the per-journal and aggregate CSV files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreRow {
    #[serde(rename = "Journal_Website")]
    pub journal_website: String,
    #[serde(rename = "Journal_Name")]
    pub journal_name: String,
    #[serde(rename = "Volume_Issue")]
    pub volume_issue: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Abstract")]
    pub abstract_text: String,
}

impl StoreRow {
    pub fn from_record(profile: &JournalProfile, record: &Record) -> Self {
        Self {
            journal_website: profile.publisher.display_name().to_string(),
            journal_name: profile.display_name.clone(),
            volume_issue: record.volume_issue.clone(),
            title: record.title.clone(),
            authors: record.authors.clone(),
            abstract_text: record.abstract_text.clone(),
        }
    }

    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::JournalWebsite => &self.journal_website,
            Column::JournalName => &self.journal_name,
            Column::VolumeIssue => &self.volume_issue,
            Column::Title => &self.title,
            Column::Authors => &self.authors,
            Column::Abstract => &self.abstract_text,
        }
    }
}
