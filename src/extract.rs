//! Record extraction from paper landing pages.

use crate::error::ExtractionFailure;
use crate::fetch::PageFetcher;
use crate::models::{PaperLink, Record};
use crate::profiles::SelectorProfile;
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Load one paper page and extract a complete record from it.
///
/// # Errors
///
/// Any [`ExtractionFailure`]; the caller drops the paper.
pub async fn extract_record<F: PageFetcher>(
    link: &PaperLink,
    profile: &SelectorProfile,
    fetcher: &F,
    settle_delay: Duration,
) -> Result<Record, ExtractionFailure> {
    let doc = fetcher.fetch(link.as_str(), settle_delay).await?;
    profile.extract(&doc)
}

/// Records extracted from a list of paper links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// In link order.
    pub records: Vec<Record>,
    pub failures: usize,
}

/// Extract records from every link, keeping link order.
///
/// Up to `concurrency` pages are in flight at once; results are still
/// yielded in input order. A concurrency of 1 visits pages one at a time.
#[instrument(level = "info", skip_all, fields(links = links.len(), concurrency = concurrency))]
pub async fn extract_records<F: PageFetcher>(
    links: &[PaperLink],
    profile: &SelectorProfile,
    fetcher: &F,
    settle_delay: Duration,
    concurrency: usize,
) -> Extraction {
    let results: Vec<Result<Record, ExtractionFailure>> = stream::iter(links)
        .map(|link| async move {
            let result = extract_record(link, profile, fetcher, settle_delay).await;
            match &result {
                Ok(record) => debug!(
                    %link,
                    volume_issue = %record.volume_issue,
                    title = %truncate_for_log(&record.title, 80),
                    "Extracted record"
                ),
                Err(e) => warn!(error = %e, %link, "Paper dropped"),
            }
            result
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut extraction = Extraction::default();
    for result in results {
        match result {
            Ok(record) => extraction.records.push(record),
            Err(_) => extraction.failures += 1,
        }
    }

    info!(
        count = extraction.records.len(),
        failures = extraction.failures,
        "Extracted records"
    );
    extraction
}
