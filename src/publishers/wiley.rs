//! Wiley Online Library journals, addressed by their numeric journal id.

use super::{IssueSource, PublisherSpec, landing_page};
use crate::enumerate::UrlTemplate;
use crate::error::ConfigError;
use crate::profiles::SelectorProfile;

pub fn spec() -> Result<PublisherSpec, ConfigError> {
    let selectors = SelectorProfile::new(
        ".citation__title",
        "div#sb-1 > div > div > span > a > span",
        "div.article-section__content > p",
        ".volume-issue",
        "a.issue-item__title.visitable",
    )?;

    Ok(PublisherSpec {
        selectors,
        issues: IssueSource::Template(UrlTemplate::new(
            "https://onlinelibrary.wiley.com/toc/{key}/{volume}/{issue}",
        )),
        latest_volume: Some(landing_page(
            "https://onlinelibrary.wiley.com/journal/{key}",
            "div.cover-image__details span.comma",
            r"Volume (\d+)",
        )?),
    })
}
