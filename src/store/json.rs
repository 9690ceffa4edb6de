//! Per-run JSON dump of extracted records.
//!
//! Each journal run writes the records it extracted, before any merging,
//! to `{data_dir}/runs/{date}/{publisher}_{journal}.json` as an array of
//! `[volume_issue, [title, authors, abstract]]` elements. A second run on
//! the same day replaces the file.

use crate::error::StoreError;
use crate::models::{JournalProfile, RawPaper, Record};
use crate::utils::slugify;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a journal run's records to its dated JSON file.
///
/// # Arguments
///
/// * `data_dir` - Base data directory
/// * `profile` - The journal the records belong to
/// * `records` - Extracted records, in extraction order
/// * `date` - Run date naming the subdirectory
///
/// # Returns
///
/// The path written, or an error if directory creation or writing fails.
#[instrument(level = "info", skip_all, fields(journal = %profile.label(), records = records.len()))]
pub async fn write_run_json(
    data_dir: &Path,
    profile: &JournalProfile,
    records: &[Record],
    date: NaiveDate,
) -> Result<PathBuf, StoreError> {
    let papers: Vec<RawPaper> = records.iter().map(RawPaper::from).collect();
    let json = serde_json::to_string(&papers)?;

    let run_dir = data_dir.join("runs").join(date.to_string());
    if let Err(e) = fs::create_dir_all(&run_dir).await {
        error!(run_dir = %run_dir.display(), error = %e, "Failed to create run dir");
        return Err(StoreError::Io {
            path: run_dir,
            source: e,
        });
    }

    let path = run_dir.join(format!(
        "{}_{}.json",
        profile.publisher.id(),
        slugify(&profile.journal_key)
    ));
    fs::write(&path, json).await.map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Wrote run JSON");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueLayout, Publisher};

    fn profile() -> JournalProfile {
        JournalProfile {
            publisher: Publisher::Aea,
            journal_key: "aer".to_string(),
            url_key: "aer".to_string(),
            display_name: "American Economic Review".to_string(),
            issue_layout: IssueLayout::PerVolume(12),
            latest_volume: Some(114),
        }
    }

    #[tokio::test]
    async fn test_write_run_json_layout_and_shape() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![Record {
            volume_issue: "Volume 114, Issue 3".to_string(),
            title: "Trade".to_string(),
            authors: "Jane Doe".to_string(),
            abstract_text: "We study trade.".to_string(),
            metrics: Some("Metrics NA".to_string()),
        }];
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();

        let path = write_run_json(dir.path(), &profile(), &records, date)
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("runs/2025-05-06/aea_aer.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            r#"[["Volume 114, Issue 3",["Trade","Jane Doe","We study trade.","Metrics NA"]]]"#
        );
    }

    #[tokio::test]
    async fn test_empty_run_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let path = write_run_json(dir.path(), &profile(), &[], date).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }
}
