//! Selector profiles: where each field lives on a publisher's pages.
//!
//! A [`SelectorProfile`] is data plus a few lookups. The pipeline is the
//! same for every publisher; only the profile differs.
//!
//! # Fields
//!
//! | Field | Lookup | Cleanup |
//! |-------|--------|---------|
//! | title | first match | `title_rules` |
//! | authors | every match, joined with `", "` | `author_rules` on the joined text |
//! | abstract | first match | `abstract_rules` |
//! | volume/issue | first match | [`VolumeIssueFormat`] |
//! | metrics | first match, optional, else `metrics_fallback` | whitespace collapsed |
//!
//! A required field whose text is empty after cleanup counts as not found.

use crate::error::{ConfigError, ExtractionFailure};
use crate::fetch::{Document, Locator};
use crate::models::{PaperLink, Record};
use crate::normalize::{TextRules, VolumeIssueFormat, collapse_whitespace};
use itertools::Itertools;
use serde::Deserialize;
use std::fmt;

/// A required field of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Authors,
    Abstract,
    VolumeIssue,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Title => "title",
            Field::Authors => "authors",
            Field::Abstract => "abstract",
            Field::VolumeIssue => "volume_issue",
        })
    }
}

/// How a matched paper-link element yields its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRule {
    /// The element's `href`, resolved against the page URL.
    Href,
    /// The element's text is the URL (JSTOR prints stable URLs in the page).
    Text,
}

#[derive(Debug, Clone)]
pub struct SelectorProfile {
    pub title: Locator,
    pub authors: Locator,
    pub abstract_text: Locator,
    pub volume_issue: Locator,
    pub paper_links: Locator,
    pub metrics: Option<Locator>,
    /// Recorded as metrics when the page shows none.
    pub metrics_fallback: Option<String>,
    pub link_rule: LinkRule,
    pub title_rules: TextRules,
    pub author_rules: TextRules,
    pub abstract_rules: TextRules,
    pub volume_issue_format: VolumeIssueFormat,
}

impl SelectorProfile {
    /// Profile with default cleanup: a leading "Abstract" label is stripped
    /// from abstracts and volume/issue text uses the standard format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Selector`] if any selector is not valid CSS.
    pub fn new(
        title: &str,
        authors: &str,
        abstract_text: &str,
        volume_issue: &str,
        paper_links: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            title: Locator::parse(title)?,
            authors: Locator::parse(authors)?,
            abstract_text: Locator::parse(abstract_text)?,
            volume_issue: Locator::parse(volume_issue)?,
            paper_links: Locator::parse(paper_links)?,
            metrics: None,
            metrics_fallback: None,
            link_rule: LinkRule::Href,
            title_rules: TextRules::default(),
            author_rules: TextRules::default(),
            abstract_rules: TextRules::leading(&["Abstract"]),
            volume_issue_format: VolumeIssueFormat::standard(),
        })
    }

    pub fn locate_title(&self, doc: &Document) -> Option<String> {
        let element = doc.find(&self.title)?;
        non_empty(self.title_rules.apply(&Document::text(element)))
    }

    pub fn locate_authors(&self, doc: &Document) -> Option<String> {
        let joined = doc
            .find_all(&self.authors)
            .into_iter()
            .map(Document::text)
            .filter(|name| !name.is_empty())
            .join(", ");
        non_empty(self.author_rules.apply(&joined))
    }

    pub fn locate_abstract(&self, doc: &Document) -> Option<String> {
        let element = doc.find(&self.abstract_text)?;
        non_empty(self.abstract_rules.apply(&Document::text(element)))
    }

    /// Raw volume/issue text, whitespace collapsed but not yet reformatted.
    pub fn locate_volume_issue(&self, doc: &Document) -> Option<String> {
        let element = doc.find(&self.volume_issue)?;
        non_empty(collapse_whitespace(&Document::text(element)))
    }

    pub fn locate_metrics(&self, doc: &Document) -> Option<String> {
        self.metrics
            .as_ref()
            .and_then(|locator| doc.find(locator))
            .and_then(|element| non_empty(collapse_whitespace(&Document::text(element))))
            .or_else(|| self.metrics_fallback.clone())
    }

    pub fn normalize_volume_issue(&self, raw: &str) -> Option<String> {
        self.volume_issue_format.normalize(raw)
    }

    /// Paper URLs listed on an issue page, in page order.
    ///
    /// Links that do not resolve to an absolute URL are skipped. Repeats
    /// within the page are dropped, keeping the first.
    pub fn locate_paper_links(&self, doc: &Document) -> Vec<PaperLink> {
        doc.find_all(&self.paper_links)
            .into_iter()
            .filter_map(|element| match self.link_rule {
                LinkRule::Href => Document::attribute(element, "href"),
                LinkRule::Text => Some(Document::text(element)),
            })
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .filter_map(|raw| doc.url().join(&raw).ok())
            .map(|url| PaperLink(url.to_string()))
            .unique()
            .collect()
    }

    /// Build a complete [`Record`] from a paper page.
    ///
    /// # Errors
    ///
    /// - [`ExtractionFailure::FieldNotFound`] when a required field is missing or empty
    /// - [`ExtractionFailure::UnparseableVolumeIssue`] when the volume/issue text
    ///   has no volume number
    pub fn extract(&self, doc: &Document) -> Result<Record, ExtractionFailure> {
        let title = self
            .locate_title(doc)
            .ok_or(ExtractionFailure::FieldNotFound(Field::Title))?;
        let authors = self
            .locate_authors(doc)
            .ok_or(ExtractionFailure::FieldNotFound(Field::Authors))?;
        let abstract_text = self
            .locate_abstract(doc)
            .ok_or(ExtractionFailure::FieldNotFound(Field::Abstract))?;
        let raw_volume_issue = self
            .locate_volume_issue(doc)
            .ok_or(ExtractionFailure::FieldNotFound(Field::VolumeIssue))?;
        let volume_issue = self
            .normalize_volume_issue(&raw_volume_issue)
            .ok_or(ExtractionFailure::UnparseableVolumeIssue(raw_volume_issue))?;

        Ok(Record {
            volume_issue,
            title,
            authors,
            abstract_text,
            metrics: self.locate_metrics(doc),
        })
    }

    /// Replace the selectors named in `overrides`, keeping the rest.
    pub fn apply_overrides(&mut self, overrides: &SelectorOverrides) {
        let pairs = [
            (&mut self.title, &overrides.title),
            (&mut self.authors, &overrides.authors),
            (&mut self.abstract_text, &overrides.abstract_text),
            (&mut self.volume_issue, &overrides.volume_issue),
            (&mut self.paper_links, &overrides.paper_links),
        ];
        for (slot, replacement) in pairs {
            if let Some(locator) = replacement {
                *slot = locator.clone();
            }
        }
        if let Some(metrics) = &overrides.metrics {
            self.metrics = Some(metrics.clone());
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

/// Per-publisher selector replacements read from the journals config.
///
/// Selectors are validated while the config is parsed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorOverrides {
    pub title: Option<Locator>,
    pub authors: Option<Locator>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<Locator>,
    pub volume_issue: Option<Locator>,
    pub paper_links: Option<Locator>,
    pub metrics: Option<Locator>,
}
