//! JSTOR journals.
//!
//! The journal page lists volumes by decade, each with its issues newest
//! first. Issue pages print each paper's stable URL as text rather than
//! linking it.

use super::{IssueSource, PublisherSpec, index};
use crate::error::ConfigError;
use crate::profiles::{LinkRule, SelectorProfile};

pub fn spec() -> Result<PublisherSpec, ConfigError> {
    let mut selectors = SelectorProfile::new(
        "mfe-turnaway-pharos-heading[data-pharos-component='PharosHeading']",
        "p.content-meta-data__authors",
        "div.turnaway-preview-appendix__section--prominent p.turnaway-preview-appendix__section-paragraph",
        "mfe-turnaway-pharos-link[data-pharos-component='PharosLink']",
        "div.stable",
    )?;
    selectors.link_rule = LinkRule::Text;
    selectors.metrics_fallback = Some("Metrics NA".to_string());

    Ok(PublisherSpec {
        selectors,
        issues: IssueSource::Index(index(
            "https://www.jstor.org/journal/{key}",
            ".decade .year-volume-heading",
            "strong",
            r"(?i)vol\.?\s*(\d+)",
            "li collection-view-pharos-link",
        )?),
        latest_volume: None,
    })
}
