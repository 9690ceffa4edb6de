//! Issue discovery for publishers without templatable issue URLs.
//!
//! AEA and JSTOR list every volume and its issues on one index page,
//! newest volume first and newest issue first within a volume. Other
//! publishers need only the newest volume number, read from the journal's
//! landing page when the config does not pin it.

use crate::error::EnumerateError;
use crate::fetch::{Document, Locator, PageFetcher};
use crate::models::{IssueRef, JournalProfile};
use itertools::Itertools;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Layout of a publisher's issue index page.
#[derive(Debug, Clone)]
pub struct IssueIndex {
    /// Index URL; `{key}` is replaced by the journal's URL key.
    pub url: String,
    /// One element per volume, newest first.
    pub volume_block: Locator,
    /// Element inside a block holding the volume label.
    pub volume_label: Locator,
    /// Captures the volume number in its first group.
    pub volume_pattern: Regex,
    /// Issue links inside a block, newest first.
    pub issue_link: Locator,
}

/// Where to read a journal's newest volume number.
#[derive(Debug, Clone)]
pub struct LatestVolumePage {
    /// Landing page URL; `{key}` is replaced by the journal's URL key.
    pub url: String,
    pub locator: Locator,
    /// Captures the volume number in its first group.
    pub pattern: Regex,
}

/// Issue pages of the newest `trailing` volumes listed on the index.
///
/// Blocks without a readable volume number are skipped, and a volume listed
/// twice keeps its first block. Issues inside a volume block are numbered
/// from the block's issue count down to 1, since the index lists the newest
/// issue first. The result is sorted by volume, then issue.
///
/// # Errors
///
/// - [`EnumerateError::Index`] if the index page cannot be loaded
/// - [`EnumerateError::UnsupportedJournal`] if the index lists no numbered volume
#[instrument(level = "info", skip_all, fields(journal = %profile.label(), trailing = trailing))]
pub async fn discover_issue_urls<F: PageFetcher>(
    index: &IssueIndex,
    profile: &JournalProfile,
    fetcher: &F,
    settle_delay: Duration,
    trailing: u32,
) -> Result<Vec<(String, IssueRef)>, EnumerateError> {
    let url = index.url.replace("{key}", &profile.url_key);
    let doc = fetcher.fetch(&url, settle_delay).await?;

    let volumes: Vec<_> = doc
        .find_all(&index.volume_block)
        .into_iter()
        .filter_map(|block| {
            let label = Document::find_within(block, &index.volume_label).map(Document::text);
            let volume = label
                .as_deref()
                .and_then(|text| first_number(&index.volume_pattern, text));
            if volume.is_none() {
                warn!(label = ?label, "Volume block without a volume number");
            }
            volume.map(|volume| (volume, block))
        })
        .unique_by(|(volume, _)| *volume)
        .collect();
    if volumes.is_empty() {
        return Err(EnumerateError::unsupported(
            &profile.label(),
            "journal has no issue data",
        ));
    }

    let mut issues = Vec::new();
    for (volume, block) in volumes.into_iter().take(trailing as usize) {
        let hrefs: Vec<String> = Document::find_all_within(block, &index.issue_link)
            .into_iter()
            .filter_map(|link| Document::attribute(link, "href"))
            .filter_map(|href| doc.url().join(href.trim()).ok())
            .map(|url| url.to_string())
            .collect();
        debug!(volume, issues = hrefs.len(), "Read volume block");

        let count = hrefs.len() as u32;
        for (position, href) in hrefs.into_iter().enumerate() {
            let issue_ref = IssueRef {
                volume,
                issue: Some(count - position as u32),
            };
            issues.push((href, issue_ref));
        }
    }

    issues.sort_by_key(|(_, issue_ref)| *issue_ref);
    info!(count = issues.len(), "Discovered issue pages");
    Ok(issues)
}

/// Newest volume number among the elements matching `locator`.
pub fn latest_volume_from(doc: &Document, locator: &Locator, pattern: &Regex) -> Option<u32> {
    doc.find_all(locator)
        .into_iter()
        .filter_map(|element| first_number(pattern, &Document::text(element)))
        .max()
}

/// Fetch the landing page named by `landing` and read the newest volume.
///
/// # Errors
///
/// - [`EnumerateError::Index`] if the page cannot be loaded
/// - [`EnumerateError::UnknownLatestVolume`] if no volume number is found
#[instrument(level = "info", skip_all, fields(journal = %profile.label()))]
pub async fn lookup_latest_volume<F: PageFetcher>(
    landing: &LatestVolumePage,
    profile: &JournalProfile,
    fetcher: &F,
    settle_delay: Duration,
) -> Result<u32, EnumerateError> {
    let url = landing.url.replace("{key}", &profile.url_key);
    let doc = fetcher.fetch(&url, settle_delay).await?;
    let volume = latest_volume_from(&doc, &landing.locator, &landing.pattern)
        .ok_or_else(|| EnumerateError::UnknownLatestVolume(profile.label()))?;
    info!(volume, "Found latest volume");
    Ok(volume)
}

fn first_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}
