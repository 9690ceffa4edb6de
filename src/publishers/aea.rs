//! American Economic Association journals (AER, the AEJs, JEL, JEP).
//!
//! The issues page groups issue links by volume, newest first. Paper pages
//! print no citation count.

use super::{IssueSource, PublisherSpec, index};
use crate::error::ConfigError;
use crate::profiles::SelectorProfile;

pub fn spec() -> Result<PublisherSpec, ConfigError> {
    let mut selectors = SelectorProfile::new(
        "h1.title",
        "ul.attribution li.author",
        "section.article-information.abstract",
        "div.journal",
        "article.journal-article h3.title a",
    )?;
    selectors.metrics_fallback = Some("Metrics NA".to_string());

    Ok(PublisherSpec {
        selectors,
        issues: IssueSource::Index(index(
            "https://www.aeaweb.org/journals/{key}/issues",
            ".volume-container",
            ".volume-label",
            r"(?i)vol(?:ume)?\.?\s*(\d+)",
            ".issue-item a",
        )?),
        latest_volume: None,
    })
}
