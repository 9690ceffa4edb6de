//! University of Chicago Press journals (JPE, JOLE, ...).

use super::{IssueSource, PublisherSpec, landing_page};
use crate::enumerate::UrlTemplate;
use crate::error::ConfigError;
use crate::profiles::SelectorProfile;

pub fn spec() -> Result<PublisherSpec, ConfigError> {
    let selectors = SelectorProfile::new(
        "h1.citation__title",
        "a.author-name span",
        "div.abstractSection.abstractInFull p",
        ".current-issue__meta",
        "div.issue-item h4.issue-item__title a",
    )?;

    Ok(PublisherSpec {
        selectors,
        issues: IssueSource::Template(UrlTemplate::new(
            "https://www.journals.uchicago.edu/toc/{key}/{volume}/{issue}",
        )),
        latest_volume: Some(landing_page(
            "https://www.journals.uchicago.edu/loi/{key}",
            ".issue__vol",
            r"Volume (\d+)",
        )?),
    })
}
