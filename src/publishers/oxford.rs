//! Oxford Academic journals.
//!
//! Journals whose issue numbers keep counting across volumes (The Economic
//! Journal) have no usable URL scheme and are configured as non-resetting.

use super::{IssueSource, PublisherSpec, landing_page};
use crate::enumerate::UrlTemplate;
use crate::error::ConfigError;
use crate::profiles::SelectorProfile;

pub fn spec() -> Result<PublisherSpec, ConfigError> {
    let selectors = SelectorProfile::new(
        "h1.wi-article-title",
        "div.wi-authors span.al-author-name-more button.linked-name",
        "section.abstract p",
        "div.volume-issue__wrap",
        "h5.customLink.item-title > a",
    )?;

    Ok(PublisherSpec {
        selectors,
        issues: IssueSource::Template(UrlTemplate::new(
            "https://academic.oup.com/{key}/issue/{volume}/{issue}",
        )),
        latest_volume: Some(landing_page(
            "https://academic.oup.com/{key}/issue",
            "div.volume-issue__wrap",
            r"Volume (\d+)",
        )?),
    })
}
