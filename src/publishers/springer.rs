//! Springer journals.
//!
//! Paper pages print only the volume, so every record is filed under
//! issue 1 of its volume.

use super::{IssueSource, PublisherSpec, landing_page};
use crate::enumerate::UrlTemplate;
use crate::error::ConfigError;
use crate::normalize::VolumeIssueFormat;
use crate::profiles::SelectorProfile;

pub fn spec() -> Result<PublisherSpec, ConfigError> {
    let mut selectors = SelectorProfile::new(
        "h1.c-article-title",
        "ul.c-article-author-list li a[data-test='author-name']",
        "div.c-article-section__content p",
        "span[data-test='journal-volume']",
        "article.c-card-open h3.c-card-open__heading a",
    )?;
    selectors.volume_issue_format = VolumeIssueFormat::volume_only();

    Ok(PublisherSpec {
        selectors,
        issues: IssueSource::Template(UrlTemplate::new(
            "https://link.springer.com/journal/{key}/volumes-and-issues/{volume}-{issue}",
        )),
        latest_volume: Some(landing_page(
            "https://link.springer.com/journal/{key}/volumes-and-issues",
            "li.app-section h2.app-section__heading span.u-display-block.u-flex-grow, li.app-vol-and-issues-item h2 span",
            r"Volume (\d+)",
        )?),
    })
}
