//! Built-in profiles for each supported publisher.
//!
//! Every publisher module exports `spec()`, returning the selectors for its
//! paper pages together with how its issue pages are found.
//!
//! # Supported Publishers
//!
//! | Publisher | Module | Issue pages | Latest volume |
//! |-----------|--------|-------------|---------------|
//! | Elsevier | [`elsevier`] | URL template, volume-only pages | journal issues page |
//! | Wiley | [`wiley`] | URL template | journal landing page |
//! | Econometrica | [`econometrica`] | URL template addressed by year | journal landing page |
//! | Oxford | [`oxford`] | URL template | issue archive page |
//! | Springer | [`springer`] | URL template | volumes and issues page |
//! | AEA | [`aea`] | issue index | from the index |
//! | JSTOR | [`jstor`] | issue index | from the index |
//! | UChicago | [`uchicago`] | URL template | current issue page |

pub mod aea;
pub mod econometrica;
pub mod elsevier;
pub mod jstor;
pub mod oxford;
pub mod springer;
pub mod uchicago;
pub mod wiley;

use crate::discover::{IssueIndex, LatestVolumePage};
use crate::enumerate::UrlTemplate;
use crate::error::ConfigError;
use crate::fetch::Locator;
use crate::models::Publisher;
use crate::profiles::SelectorProfile;
use regex::Regex;

/// How a publisher's issue listing pages are found.
#[derive(Debug, Clone)]
pub enum IssueSource {
    /// Computed from the volume and issue numbers.
    Template(UrlTemplate),
    /// Read from an index page listing every volume.
    Index(IssueIndex),
}

/// Everything the pipeline needs to know about one publisher.
#[derive(Debug, Clone)]
pub struct PublisherSpec {
    pub selectors: SelectorProfile,
    pub issues: IssueSource,
    /// Used when the journal config does not pin a latest volume.
    pub latest_volume: Option<LatestVolumePage>,
}

/// The built-in spec for `publisher`.
///
/// # Errors
///
/// Returns [`ConfigError`] only if a built-in selector or pattern is invalid.
pub fn spec(publisher: Publisher) -> Result<PublisherSpec, ConfigError> {
    match publisher {
        Publisher::Elsevier => elsevier::spec(),
        Publisher::Wiley => wiley::spec(),
        Publisher::Econometrica => econometrica::spec(),
        Publisher::Oxford => oxford::spec(),
        Publisher::Springer => springer::spec(),
        Publisher::Aea => aea::spec(),
        Publisher::Jstor => jstor::spec(),
        Publisher::UChicago => uchicago::spec(),
    }
}

fn landing_page(url: &str, locator: &str, pattern: &str) -> Result<LatestVolumePage, ConfigError> {
    Ok(LatestVolumePage {
        url: url.to_string(),
        locator: Locator::parse(locator)?,
        pattern: Regex::new(pattern)?,
    })
}

fn index(
    url: &str,
    volume_block: &str,
    volume_label: &str,
    volume_pattern: &str,
    issue_link: &str,
) -> Result<IssueIndex, ConfigError> {
    Ok(IssueIndex {
        url: url.to_string(),
        volume_block: Locator::parse(volume_block)?,
        volume_label: Locator::parse(volume_label)?,
        volume_pattern: Regex::new(volume_pattern)?,
        issue_link: Locator::parse(issue_link)?,
    })
}
