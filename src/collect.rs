//! Paper link collection from issue listing pages.
//!
//! Pages are visited strictly in order. A page that fails to load is
//! logged, counted and skipped; the rest of the run carries on. Links are
//! deduplicated within a page only: a paper reprinted in two issues shows
//! up twice here and is collapsed later by the store merge.

use crate::fetch::PageFetcher;
use crate::models::PaperLink;
use crate::profiles::SelectorProfile;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Links gathered from a set of issue pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCollection {
    /// Page order, then within-page order.
    pub links: Vec<PaperLink>,
    /// Issue pages that could not be loaded.
    pub failures: usize,
}

/// Visit each issue page and collect its paper links.
///
/// # Arguments
///
/// * `urls` - Issue listing URLs, in visiting order
/// * `profile` - Selectors for the publisher's paper links
/// * `fetcher` - Page loader
/// * `settle_delay` - Wait applied before each page load
///
/// # Returns
///
/// The concatenated links and the number of pages that failed.
#[instrument(level = "info", skip_all, fields(pages = urls.len()))]
pub async fn collect_links<F: PageFetcher>(
    urls: &[String],
    profile: &SelectorProfile,
    fetcher: &F,
    settle_delay: Duration,
) -> LinkCollection {
    let pages: Vec<Option<Vec<PaperLink>>> = stream::iter(urls)
        .then(|url| async move {
            match fetcher.fetch(url, settle_delay).await {
                Ok(doc) => {
                    let links = profile.locate_paper_links(&doc);
                    debug!(%url, count = links.len(), "Collected paper links");
                    Some(links)
                }
                Err(e) => {
                    warn!(error = %e, %url, "Issue page failed, skipping");
                    None
                }
            }
        })
        .collect()
        .await;

    let mut collection = LinkCollection::default();
    for page in pages {
        match page {
            Some(links) => collection.links.extend(links),
            None => collection.failures += 1,
        }
    }

    info!(
        count = collection.links.len(),
        failures = collection.failures,
        "Collected paper links"
    );
    collection
}
