//! Econometrica, hosted on Wiley but with issue pages addressed by year.

use super::{IssueSource, PublisherSpec, landing_page};
use crate::enumerate::UrlTemplate;
use crate::error::ConfigError;
use crate::profiles::SelectorProfile;

/// Volume `v` of Econometrica was published in year `v + 1932`.
const YEAR_OFFSET: i32 = 1932;

pub fn spec() -> Result<PublisherSpec, ConfigError> {
    let selectors = SelectorProfile::new(
        ".citation__title",
        ".author-name",
        "div.article-section__content.en.main",
        ".volume-issue",
        "a.issue-item__title.visitable",
    )?;

    Ok(PublisherSpec {
        selectors,
        issues: IssueSource::Template(
            UrlTemplate::new("https://onlinelibrary.wiley.com/toc/{key}/{year}/{volume}/{issue}")
                .with_year_offset(YEAR_OFFSET),
        ),
        latest_volume: Some(landing_page(
            "https://onlinelibrary.wiley.com/journal/{key}",
            "div.cover-image__details span.comma",
            r"Volume (\d+)",
        )?),
    })
}
