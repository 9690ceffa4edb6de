//! Issue-listing URL enumeration.
//!
//! Given a journal's latest volume, how it splits volumes into issues, and
//! how many trailing volumes to re-scan, compute every listing page to
//! visit. A run can instead name its volumes and issues explicitly to
//! backfill older issues. Pure: no I/O happens here.
//!
//! # Template Placeholders
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{key}` | the journal's slug or numeric id |
//! | `{volume}` | volume number |
//! | `{issue}` | issue number |
//! | `{year}` | volume + the template's year offset |

use crate::error::EnumerateError;
use crate::models::{IssueLayout, IssueRef, JournalProfile};

/// URL scheme of a publisher's issue listing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    /// Used when the journal has numbered issues.
    pub issue: String,
    /// Used for journals without issue subdivision, if the publisher has such pages.
    pub volume_only: Option<String>,
    /// Added to the volume number to fill `{year}`.
    pub year_offset: Option<i32>,
}

impl UrlTemplate {
    pub fn new(issue: &str) -> Self {
        Self {
            issue: issue.to_string(),
            volume_only: None,
            year_offset: None,
        }
    }

    pub fn with_volume_only(mut self, template: &str) -> Self {
        self.volume_only = Some(template.to_string());
        self
    }

    pub fn with_year_offset(mut self, offset: i32) -> Self {
        self.year_offset = Some(offset);
        self
    }

    /// Fill in the template for one issue; `None` when the journal needs a
    /// volume-only page and the publisher has none.
    pub fn render(&self, key: &str, issue_ref: IssueRef) -> Option<String> {
        let template = match issue_ref.issue {
            Some(_) => &self.issue,
            None => self.volume_only.as_ref()?,
        };
        let mut url = template
            .replace("{key}", key)
            .replace("{volume}", &issue_ref.volume.to_string());
        if let Some(issue) = issue_ref.issue {
            url = url.replace("{issue}", &issue.to_string());
        }
        if let Some(offset) = self.year_offset {
            let year = i64::from(issue_ref.volume) + i64::from(offset);
            url = url.replace("{year}", &year.to_string());
        }
        Some(url)
    }
}

/// Which volumes and issues a run visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueSelection {
    /// Every issue of the newest `n` volumes.
    Trailing(u32),
    /// Exactly these volumes; every issue of each when `issues` is empty.
    Explicit { volumes: Vec<u32>, issues: Vec<u32> },
}

impl IssueSelection {
    /// Explicit volumes and issues, sorted and without repeats.
    pub fn explicit(volumes: &[u32], issues: &[u32]) -> Self {
        let sorted = |values: &[u32]| {
            let mut values = values.to_vec();
            values.sort_unstable();
            values.dedup();
            values
        };
        IssueSelection::Explicit {
            volumes: sorted(volumes),
            issues: sorted(issues),
        }
    }

    /// Whether an issue read off an index page belongs to this selection.
    pub fn includes(&self, issue_ref: IssueRef) -> bool {
        match self {
            IssueSelection::Trailing(_) => true,
            IssueSelection::Explicit { volumes, issues } => {
                volumes.contains(&issue_ref.volume)
                    && (issues.is_empty()
                        || issue_ref.issue.is_some_and(|issue| issues.contains(&issue)))
            }
        }
    }
}

/// Reject journals the template cannot address before any page is fetched.
pub fn check_supported(
    profile: &JournalProfile,
    template: &UrlTemplate,
) -> Result<(), EnumerateError> {
    match profile.issue_layout {
        IssueLayout::NonResetting => Err(EnumerateError::unsupported(
            &profile.label(),
            "issue numbers do not reset per volume",
        )),
        IssueLayout::Unsubdivided if template.volume_only.is_none() => Err(
            EnumerateError::unsupported(&profile.label(), "publisher has no per-volume listing page"),
        ),
        _ => Ok(()),
    }
}

/// Issues to visit for the last `trailing` volumes up to `latest_volume`.
///
/// Volumes run from `max(1, latest - trailing + 1)` to `latest`; within each
/// volume, issues `1..=n` for `PerVolume(n)` or a single `None` issue.
/// `NonResetting` journals yield nothing; callers check support first.
pub fn enumerate_issue_refs(layout: IssueLayout, latest_volume: u32, trailing: u32) -> Vec<IssueRef> {
    if trailing == 0 || latest_volume == 0 {
        return Vec::new();
    }
    let start = latest_volume.saturating_sub(trailing - 1).max(1);

    let mut refs = Vec::new();
    for volume in start..=latest_volume {
        match layout {
            IssueLayout::PerVolume(count) => {
                refs.extend((1..=count).map(|issue| IssueRef {
                    volume,
                    issue: Some(issue),
                }));
            }
            IssueLayout::Unsubdivided => refs.push(IssueRef { volume, issue: None }),
            IssueLayout::NonResetting => {}
        }
    }
    refs
}

/// Issues for explicitly named volumes, in volume-major, issue-minor order.
///
/// Named issues are used as given, whatever the journal's layout, so
/// absolute issue numbers of a non-resetting journal can be addressed too.
/// Without named issues each volume expands according to `layout`.
pub fn explicit_issue_refs(layout: IssueLayout, volumes: &[u32], issues: &[u32]) -> Vec<IssueRef> {
    volumes
        .iter()
        .flat_map(|&volume| {
            if issues.is_empty() {
                enumerate_issue_refs(layout, volume, 1)
            } else {
                issues
                    .iter()
                    .map(|&issue| IssueRef {
                        volume,
                        issue: Some(issue),
                    })
                    .collect()
            }
        })
        .collect()
}

/// Render each issue through `template`.
///
/// # Errors
///
/// [`EnumerateError::UnsupportedJournal`] if an issue has no URL, i.e. a
/// volume-only issue at a publisher without volume pages.
pub fn render_issue_urls(
    profile: &JournalProfile,
    template: &UrlTemplate,
    refs: Vec<IssueRef>,
) -> Result<Vec<(String, IssueRef)>, EnumerateError> {
    refs.into_iter()
        .map(|issue_ref| {
            template
                .render(&profile.url_key, issue_ref)
                .map(|url| (url, issue_ref))
                .ok_or_else(|| {
                    EnumerateError::unsupported(&profile.label(), "no URL for this issue layout")
                })
        })
        .collect()
}

/// Ordered `(url, issue)` pairs for a journal.
///
/// # Errors
///
/// - [`EnumerateError::UnsupportedJournal`] for non-resetting issue numbering,
///   or an unsubdivided journal at a publisher without volume pages
/// - [`EnumerateError::UnknownLatestVolume`] when the profile has no latest volume
pub fn enumerate_issue_urls(
    profile: &JournalProfile,
    template: &UrlTemplate,
    trailing: u32,
) -> Result<Vec<(String, IssueRef)>, EnumerateError> {
    check_supported(profile, template)?;
    let latest = profile
        .latest_volume
        .ok_or_else(|| EnumerateError::UnknownLatestVolume(profile.label()))?;

    let refs = enumerate_issue_refs(profile.issue_layout, latest, trailing);
    render_issue_urls(profile, template, refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Publisher;

    fn profile(layout: IssueLayout, latest: Option<u32>) -> JournalProfile {
        JournalProfile {
            publisher: Publisher::UChicago,
            journal_key: "jpe".to_string(),
            url_key: "jpe".to_string(),
            display_name: "Journal of Political Economy".to_string(),
            issue_layout: layout,
            latest_volume: latest,
        }
    }

    fn template() -> UrlTemplate {
        UrlTemplate::new("https://j.example/toc/{key}/{volume}/{issue}")
            .with_volume_only("https://j.example/toc/{key}/{volume}")
    }

    #[test]
    fn test_two_issues_one_trailing_volume() {
        let urls = enumerate_issue_urls(&profile(IssueLayout::PerVolume(2), Some(10)), &template(), 1)
            .unwrap();
        assert_eq!(
            urls,
            vec![
                (
                    "https://j.example/toc/jpe/10/1".to_string(),
                    IssueRef { volume: 10, issue: Some(1) }
                ),
                (
                    "https://j.example/toc/jpe/10/2".to_string(),
                    IssueRef { volume: 10, issue: Some(2) }
                ),
            ]
        );
    }

    #[test]
    fn test_count_and_order_with_issues() {
        for (n, t, latest) in [(4u32, 3u32, 61u32), (12, 2, 131), (1, 5, 7)] {
            let refs = enumerate_issue_refs(IssueLayout::PerVolume(n), latest, t);
            assert_eq!(refs.len() as u32, t * n);
            assert_eq!(refs.first().unwrap().volume, latest - t + 1);
            assert_eq!(refs.last().unwrap(), &IssueRef { volume: latest, issue: Some(n) });
            assert!(refs.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_unsubdivided_yields_one_per_volume() {
        let urls = enumerate_issue_urls(&profile(IssueLayout::Unsubdivided, Some(70)), &template(), 3)
            .unwrap();
        let urls: Vec<_> = urls.into_iter().map(|(u, _)| u).collect();
        assert_eq!(
            urls,
            vec![
                "https://j.example/toc/jpe/68",
                "https://j.example/toc/jpe/69",
                "https://j.example/toc/jpe/70",
            ]
        );
    }

    #[test]
    fn test_trailing_clamps_at_volume_one() {
        let refs = enumerate_issue_refs(IssueLayout::Unsubdivided, 2, 5);
        assert_eq!(
            refs,
            vec![
                IssueRef { volume: 1, issue: None },
                IssueRef { volume: 2, issue: None },
            ]
        );
    }

    #[test]
    fn test_zero_trailing_is_empty() {
        assert!(enumerate_issue_refs(IssueLayout::PerVolume(4), 10, 0).is_empty());
    }

    #[test]
    fn test_explicit_volume_and_issue_backfill() {
        let profile = profile(IssueLayout::PerVolume(4), None);
        let refs = explicit_issue_refs(profile.issue_layout, &[58], &[4]);
        assert_eq!(refs, vec![IssueRef { volume: 58, issue: Some(4) }]);
        assert_eq!(
            render_issue_urls(&profile, &template(), refs).unwrap(),
            vec![(
                "https://j.example/toc/jpe/58/4".to_string(),
                IssueRef { volume: 58, issue: Some(4) }
            )]
        );
    }

    #[test]
    fn test_explicit_volumes_expand_by_layout() {
        assert_eq!(
            explicit_issue_refs(IssueLayout::PerVolume(2), &[3, 5], &[]),
            vec![
                IssueRef { volume: 3, issue: Some(1) },
                IssueRef { volume: 3, issue: Some(2) },
                IssueRef { volume: 5, issue: Some(1) },
                IssueRef { volume: 5, issue: Some(2) },
            ]
        );
        assert_eq!(
            explicit_issue_refs(IssueLayout::Unsubdivided, &[70], &[]),
            vec![IssueRef { volume: 70, issue: None }]
        );
        // Absolute issue numbers address a non-resetting journal directly.
        assert_eq!(
            explicit_issue_refs(IssueLayout::NonResetting, &[134], &[657]),
            vec![IssueRef { volume: 134, issue: Some(657) }]
        );
    }

    #[test]
    fn test_volume_only_issue_without_volume_template() {
        let template = UrlTemplate::new("https://j.example/{key}/{volume}-{issue}");
        let refs = explicit_issue_refs(IssueLayout::Unsubdivided, &[3], &[]);
        let err = render_issue_urls(&profile(IssueLayout::Unsubdivided, None), &template, refs)
            .unwrap_err();
        assert!(matches!(err, EnumerateError::UnsupportedJournal { .. }));
    }

    #[test]
    fn test_selection_sorts_and_filters() {
        let selection = IssueSelection::explicit(&[59, 58, 59], &[4, 1]);
        assert_eq!(
            selection,
            IssueSelection::Explicit {
                volumes: vec![58, 59],
                issues: vec![1, 4]
            }
        );
        assert!(selection.includes(IssueRef { volume: 58, issue: Some(4) }));
        assert!(!selection.includes(IssueRef { volume: 58, issue: Some(2) }));
        assert!(!selection.includes(IssueRef { volume: 57, issue: Some(4) }));
        assert!(!selection.includes(IssueRef { volume: 58, issue: None }));

        let whole_volume = IssueSelection::explicit(&[58], &[]);
        assert!(whole_volume.includes(IssueRef { volume: 58, issue: Some(9) }));
        assert!(IssueSelection::Trailing(1).includes(IssueRef { volume: 1, issue: None }));
    }

    #[test]
    fn test_non_resetting_is_unsupported() {
        let err = enumerate_issue_urls(&profile(IssueLayout::NonResetting, Some(134)), &template(), 1)
            .unwrap_err();
        assert!(matches!(err, EnumerateError::UnsupportedJournal { .. }));
    }

    #[test]
    fn test_unsubdivided_without_volume_template_is_unsupported() {
        let template = UrlTemplate::new("https://j.example/{key}/{volume}-{issue}");
        let err = enumerate_issue_urls(&profile(IssueLayout::Unsubdivided, Some(3)), &template, 1)
            .unwrap_err();
        assert!(matches!(err, EnumerateError::UnsupportedJournal { .. }));
    }

    #[test]
    fn test_unknown_latest_volume() {
        let err = enumerate_issue_urls(&profile(IssueLayout::PerVolume(4), None), &template(), 1)
            .unwrap_err();
        assert!(matches!(err, EnumerateError::UnknownLatestVolume(_)));
    }

    #[test]
    fn test_year_offset_fills_year() {
        let template =
            UrlTemplate::new("https://w.example/toc/{key}/{year}/{volume}/{issue}").with_year_offset(1932);
        let url = template
            .render("14680262", IssueRef { volume: 91, issue: Some(6) })
            .unwrap();
        assert_eq!(url, "https://w.example/toc/14680262/2023/91/6");
    }
}
