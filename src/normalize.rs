//! Text cleanup for extracted fields.
//!
//! Publisher pages wrap the useful text in boilerplate: an "Abstract"
//! heading, "Highlights" bullets, footnote digits glued to author names.
//! [`TextRules`] describes the cleanup for one field of one publisher, and
//! [`VolumeIssueFormat`] turns a raw volume/issue string into the canonical
//! `"Volume {V}, Issue {I}"`.

use once_cell::sync::Lazy;
use regex::Regex;

static FOOTNOTE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static VOLUME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bvol(?:ume)?\b\.?\s*(?P<vol>\d+)").unwrap());

static ISSUE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:issue|iss|number|no)\b\.?\s*(?P<iss>\d+)").unwrap());

/// Cleanup applied to one extracted field.
///
/// Steps run in field order: phrases are removed from the raw text (which
/// still has its line breaks), whitespace is collapsed, leading labels are
/// dropped, then digits and non-ASCII characters when asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRules {
    /// Removed wherever they occur.
    pub strip_phrases: Vec<String>,
    /// Removed only at the start of the text, e.g. an "Abstract" heading.
    pub strip_leading: Vec<String>,
    /// Drop digit runs (citation footnote markers in author lists).
    pub strip_footnote_digits: bool,
    /// Keep only ASCII letters, digits and spaces.
    pub ascii_only: bool,
}

impl TextRules {
    pub fn leading(labels: &[&str]) -> Self {
        Self {
            strip_leading: labels.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn apply(&self, raw: &str) -> String {
        let mut text = raw.to_string();
        for phrase in &self.strip_phrases {
            text = text.replace(phrase.as_str(), "");
        }
        let mut text = collapse_whitespace(&text);

        loop {
            let before = text.len();
            for label in &self.strip_leading {
                if let Some(rest) = strip_label(&text, label) {
                    text = rest.to_string();
                }
            }
            if text.len() == before {
                break;
            }
        }

        if self.strip_footnote_digits {
            text = FOOTNOTE_DIGITS.replace_all(&text, "").into_owned();
            text = collapse_whitespace(&text).replace(" ,", ",");
        }
        if self.ascii_only {
            text = text
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
                .collect();
            text = collapse_whitespace(&text);
        }
        text
    }
}

/// Remove `label` from the start of `text` when it stands as its own word,
/// along with a trailing colon or period.
fn strip_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(label)?;
    let boundary = rest
        .chars()
        .next()
        .is_none_or(|c| c.is_whitespace() || c == ':' || c == '.');
    if !boundary {
        return None;
    }
    Some(rest.trim_start_matches([':', '.']).trim_start())
}

/// Turn every run of whitespace, line breaks included, into a single space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// How to read volume and issue numbers out of a publisher's raw text.
#[derive(Debug, Clone)]
pub struct VolumeIssueFormat {
    volume: Regex,
    issue: Option<Regex>,
}

impl VolumeIssueFormat {
    /// Accepts "Volume 61, Issue 4", "VOL. 61 NO. 4", "Vol. 58, No. 4",
    /// "Volume 131, Number 11" and volume-only strings.
    pub fn standard() -> Self {
        Self {
            volume: VOLUME_PATTERN.clone(),
            issue: Some(ISSUE_PATTERN.clone()),
        }
    }

    /// Pages that never print an issue number.
    pub fn volume_only() -> Self {
        Self {
            volume: VOLUME_PATTERN.clone(),
            issue: None,
        }
    }

    /// Reformat `raw` to `"Volume {V}, Issue {I}"`.
    ///
    /// The issue is searched for after the volume number and defaults to 1
    /// when absent. Returns `None` when no volume number can be found.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let caps = self.volume.captures(raw)?;
        let volume: u32 = caps.name("vol")?.as_str().parse().ok()?;
        let rest = &raw[caps.get(0)?.end()..];

        let issue = self
            .issue
            .as_ref()
            .and_then(|re| re.captures(rest))
            .and_then(|c| c.name("iss"))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(1);

        Some(format!("Volume {}, Issue {}", volume, issue))
    }
}

impl Default for VolumeIssueFormat {
    fn default() -> Self {
        Self::standard()
    }
}
