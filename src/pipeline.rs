//! Journal runs: issue pages → paper links → records → dataset.
//!
//! # Stages
//!
//! 1. **Issue pages**: enumerated from a URL template, probing the latest
//!    volume first if the config does not pin it, or discovered from an
//!    issue index page. An explicit volume/issue selection replaces the
//!    trailing-volume window and needs no latest volume.
//! 2. **Links**: collected from each issue page, skipping pages that fail
//! 3. **Records**: extracted from each paper page, dropping incomplete ones
//! 4. **Store**: the run's records are dumped to JSON, then merged into the
//!    journal CSV and the aggregate CSV
//!
//! A batch runs journals one after another. A journal that fails as a
//! whole, unsupported ones included, is logged and listed in
//! [`BatchReport::skipped`]; the batch moves on to the next journal.

use crate::collect::collect_links;
use crate::discover::{discover_issue_urls, lookup_latest_volume};
use crate::enumerate::{
    IssueSelection, check_supported, enumerate_issue_urls, explicit_issue_refs, render_issue_urls,
};
use crate::error::{EnumerateError, RunError};
use crate::extract::extract_records;
use crate::fetch::PageFetcher;
use crate::models::{IssueRef, JournalProfile};
use crate::publishers::{IssueSource, PublisherSpec};
use crate::store::{CsvStore, StoreReport, write_run_json};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Settings shared by every journal of a batch.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub data_dir: PathBuf,
    pub selection: IssueSelection,
    pub settle_delay: Duration,
    /// Paper pages loaded at once; 1 is strictly sequential.
    pub concurrency: usize,
    /// Names the per-run JSON directory.
    pub run_date: NaiveDate,
}

/// One journal together with its publisher's spec.
#[derive(Debug, Clone)]
pub struct JournalJob {
    pub profile: JournalProfile,
    pub spec: PublisherSpec,
}

/// Counts for one completed journal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalReport {
    pub journal: String,
    pub issue_pages: usize,
    pub links: usize,
    pub link_failures: usize,
    pub records: usize,
    pub extraction_failures: usize,
    pub store: StoreReport,
    pub run_json: PathBuf,
}

/// A journal the batch gave up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedJournal {
    pub journal: String,
    pub reason: String,
    /// The journal cannot be scraped at all, as opposed to failing this time.
    pub unsupported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub completed: Vec<JournalReport>,
    pub skipped: Vec<SkippedJournal>,
}

/// Issue listing pages to visit for a journal, oldest first.
///
/// # Errors
///
/// Any [`EnumerateError`]: the journal is unsupported, its latest volume
/// could not be determined, or its issue index failed to load.
pub async fn issue_pages<F: PageFetcher>(
    job: &JournalJob,
    fetcher: &F,
    settings: &RunSettings,
) -> Result<Vec<(String, IssueRef)>, EnumerateError> {
    match (&job.spec.issues, &settings.selection) {
        (IssueSource::Template(template), IssueSelection::Trailing(trailing)) => {
            check_supported(&job.profile, template)?;
            let profile = match (job.profile.latest_volume, &job.spec.latest_volume) {
                (None, Some(landing)) => {
                    let latest =
                        lookup_latest_volume(landing, &job.profile, fetcher, settings.settle_delay)
                            .await?;
                    job.profile.with_latest_volume(latest)
                }
                _ => job.profile.clone(),
            };
            enumerate_issue_urls(&profile, template, *trailing)
        }
        (IssueSource::Template(template), IssueSelection::Explicit { volumes, issues }) => {
            if issues.is_empty() {
                check_supported(&job.profile, template)?;
            }
            let refs = explicit_issue_refs(job.profile.issue_layout, volumes, issues);
            render_issue_urls(&job.profile, template, refs)
        }
        (IssueSource::Index(index), selection) => {
            let trailing = match selection {
                IssueSelection::Trailing(trailing) => *trailing,
                IssueSelection::Explicit { .. } => u32::MAX,
            };
            let pages = discover_issue_urls(
                index,
                &job.profile,
                fetcher,
                settings.settle_delay,
                trailing,
            )
            .await?;
            Ok(pages
                .into_iter()
                .filter(|(_, issue_ref)| selection.includes(*issue_ref))
                .collect())
        }
    }
}

/// Scrape one journal and merge the results into the dataset.
///
/// # Errors
///
/// - [`RunError::Enumerate`] if the issue pages cannot be determined
/// - [`RunError::Store`] if the JSON dump or a CSV merge fails
#[instrument(level = "info", skip_all, fields(journal = %job.profile.label()))]
pub async fn run_journal<F: PageFetcher>(
    job: &JournalJob,
    fetcher: &F,
    settings: &RunSettings,
) -> Result<JournalReport, RunError> {
    let pages = issue_pages(job, fetcher, settings).await?;
    info!(count = pages.len(), "Issue pages to visit");
    let urls: Vec<String> = pages.into_iter().map(|(url, _)| url).collect();

    let selectors = &job.spec.selectors;
    let collection = collect_links(&urls, selectors, fetcher, settings.settle_delay).await;
    let extraction = extract_records(
        &collection.links,
        selectors,
        fetcher,
        settings.settle_delay,
        settings.concurrency,
    )
    .await;

    let run_json = write_run_json(
        &settings.data_dir,
        &job.profile,
        &extraction.records,
        settings.run_date,
    )
    .await?;
    let store = CsvStore::new(&settings.data_dir).persist(&job.profile, &extraction.records)?;

    let report = JournalReport {
        journal: job.profile.label(),
        issue_pages: urls.len(),
        links: collection.links.len(),
        link_failures: collection.failures,
        records: extraction.records.len(),
        extraction_failures: extraction.failures,
        store,
        run_json,
    };
    info!(
        records = report.records,
        added = report.store.journal.added,
        total = report.store.journal.total,
        "Journal run complete"
    );
    Ok(report)
}

/// Run every job in order, skipping journals that fail.
#[instrument(level = "info", skip_all, fields(journals = jobs.len()))]
pub async fn run_batch<F: PageFetcher>(
    jobs: &[JournalJob],
    fetcher: &F,
    settings: &RunSettings,
) -> BatchReport {
    let mut report = BatchReport::default();
    for job in jobs {
        match run_journal(job, fetcher, settings).await {
            Ok(journal_report) => report.completed.push(journal_report),
            Err(e) => {
                let unsupported = e.is_unsupported();
                if unsupported {
                    warn!(journal = %job.profile.label(), reason = %e, "Journal not supported, skipping");
                } else {
                    error!(journal = %job.profile.label(), error = %e, "Journal run failed, skipping");
                }
                report.skipped.push(SkippedJournal {
                    journal: job.profile.label(),
                    reason: e.to_string(),
                    unsupported,
                });
            }
        }
    }
    info!(
        completed = report.completed.len(),
        skipped = report.skipped.len(),
        "Batch complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::{IssueIndex, LatestVolumePage};
    use crate::enumerate::UrlTemplate;
    use crate::fetch::Locator;
    use crate::fetch::testing::StaticFetcher;
    use crate::models::{IssueLayout, Publisher, RawPaper};
    use crate::profiles::SelectorProfile;
    use crate::store::csv_store::AGGREGATE_FILE;
    use regex::Regex;

    fn spec() -> PublisherSpec {
        PublisherSpec {
            selectors: SelectorProfile::new(
                "h1.title",
                "li.author",
                "section.abstract",
                "div.journal",
                "h3 > a",
            )
            .unwrap(),
            issues: IssueSource::Template(UrlTemplate::new(
                "https://j.example/toc/{key}/{volume}/{issue}",
            )),
            latest_volume: Some(LatestVolumePage {
                url: "https://j.example/journal/{key}".to_string(),
                locator: Locator::parse("span.latest").unwrap(),
                pattern: Regex::new(r"Volume (\d+)").unwrap(),
            }),
        }
    }

    fn job(key: &str, layout: IssueLayout, latest: Option<u32>) -> JournalJob {
        JournalJob {
            profile: JournalProfile {
                publisher: Publisher::UChicago,
                journal_key: key.to_string(),
                url_key: key.to_string(),
                display_name: "Journal of Political Economy".to_string(),
                issue_layout: layout,
                latest_volume: latest,
            },
            spec: spec(),
        }
    }

    fn settings(data_dir: &std::path::Path) -> RunSettings {
        RunSettings {
            data_dir: data_dir.to_path_buf(),
            selection: IssueSelection::Trailing(1),
            settle_delay: Duration::ZERO,
            concurrency: 1,
            run_date: NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
        }
    }

    fn issue_page(hrefs: &[&str]) -> String {
        let items: String = hrefs
            .iter()
            .map(|h| format!(r#"<h3><a href="{h}">paper</a></h3>"#))
            .collect();
        format!("<html><body>{items}</body></html>")
    }

    fn paper(title: &str) -> String {
        format!(
            r#"<html><body>
            <h1 class="title">{title}</h1>
            <ul><li class="author">Jane Doe</li></ul>
            <section class="abstract">Abstract: On {title}.</section>
            <div class="journal">Volume 10, Number 1</div>
            </body></html>"#
        )
    }

    /// Volume 10 with two issues; L2 is reprinted in issue 2.
    fn site() -> StaticFetcher {
        StaticFetcher::new()
            .page("https://j.example/journal/jpe", r#"<span class="latest">Volume 10</span>"#)
            .page("https://j.example/toc/jpe/10/1", &issue_page(&["/doi/L1", "/doi/L2"]))
            .page("https://j.example/toc/jpe/10/2", &issue_page(&["/doi/L2", "/doi/L3"]))
            .page("https://j.example/doi/L1", &paper("One"))
            .page("https://j.example/doi/L2", &paper("Two"))
            .page("https://j.example/doi/L3", &paper("Three"))
    }

    #[tokio::test]
    async fn test_end_to_end_reprint_collapses_in_store() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let job = job("jpe", IssueLayout::PerVolume(2), Some(10));
        let fetcher = site();

        let report = run_journal(&job, &fetcher, &settings).await.unwrap();
        assert_eq!(report.issue_pages, 2);
        assert_eq!(report.links, 4);
        assert_eq!(report.records, 4);
        assert_eq!(report.store.journal.total, 3);
        assert_eq!(report.store.aggregate.total, 3);

        let dumped: Vec<RawPaper> =
            serde_json::from_str(&std::fs::read_to_string(&report.run_json).unwrap()).unwrap();
        assert_eq!(dumped.len(), 4);
        assert_eq!(dumped[1], dumped[2]);

        let rows = CsvStore::read_rows(&CsvStore::new(dir.path()).journal_path(&job.profile)).unwrap();
        let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert_eq!(rows[0].abstract_text, "On One.");

        let again = run_journal(&job, &fetcher, &settings).await.unwrap();
        assert_eq!(again.store.journal.added, 0);
        assert_eq!(again.store.journal.total, 3);
        assert!(dir.path().join(AGGREGATE_FILE).exists());
    }

    #[tokio::test]
    async fn test_latest_volume_is_looked_up_when_not_pinned() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = site();
        let pages = issue_pages(&job("jpe", IssueLayout::PerVolume(2), None), &fetcher, &settings(dir.path()))
            .await
            .unwrap();
        assert_eq!(
            pages.iter().map(|(url, _)| url.as_str()).collect::<Vec<_>>(),
            vec!["https://j.example/toc/jpe/10/1", "https://j.example/toc/jpe/10/2"]
        );
        assert_eq!(fetcher.requested.borrow()[0], "https://j.example/journal/jpe");
    }

    #[tokio::test]
    async fn test_explicit_issues_skip_the_latest_volume_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RunSettings {
            selection: IssueSelection::explicit(&[10], &[2]),
            ..settings(dir.path())
        };
        let fetcher = site();
        let pages = issue_pages(&job("jpe", IssueLayout::PerVolume(2), None), &fetcher, &settings)
            .await
            .unwrap();
        assert_eq!(
            pages,
            vec![(
                "https://j.example/toc/jpe/10/2".to_string(),
                IssueRef { volume: 10, issue: Some(2) }
            )]
        );
        assert!(fetcher.requested.borrow().is_empty());

        let report = run_journal(&job("jpe", IssueLayout::PerVolume(2), None), &fetcher, &settings)
            .await
            .unwrap();
        assert_eq!(report.links, 2);
        assert_eq!(report.store.journal.total, 2);
    }

    #[tokio::test]
    async fn test_explicit_issue_of_non_resetting_journal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RunSettings {
            selection: IssueSelection::explicit(&[134], &[657]),
            ..settings(dir.path())
        };
        let pages = issue_pages(&job("ej", IssueLayout::NonResetting, None), &site(), &settings)
            .await
            .unwrap();
        assert_eq!(pages[0].0, "https://j.example/toc/ej/134/657");
    }

    #[tokio::test]
    async fn test_explicit_selection_filters_index_pages() {
        let dir = tempfile::tempdir().unwrap();
        let index = IssueIndex {
            url: "https://j.example/{key}/issues".to_string(),
            volume_block: Locator::parse(".volume").unwrap(),
            volume_label: Locator::parse("h2").unwrap(),
            volume_pattern: Regex::new(r"Volume (\d+)").unwrap(),
            issue_link: Locator::parse("li a").unwrap(),
        };
        let mut index_job = job("mac", IssueLayout::PerVolume(4), None);
        index_job.spec.issues = IssueSource::Index(index);
        let fetcher = StaticFetcher::new().page(
            "https://j.example/mac/issues",
            r#"<div class="volume"><h2>Volume 60</h2><ul>
                   <li><a href="/i/602">2</a></li><li><a href="/i/601">1</a></li></ul></div>
               <div class="volume"><h2>Volume 59</h2><ul>
                   <li><a href="/i/592">2</a></li><li><a href="/i/591">1</a></li></ul></div>
               <div class="volume"><h2>Volume 58</h2><ul>
                   <li><a href="/i/584">4</a></li><li><a href="/i/583">3</a></li>
                   <li><a href="/i/582">2</a></li><li><a href="/i/581">1</a></li></ul></div>"#,
        );

        let settings = RunSettings {
            selection: IssueSelection::explicit(&[58], &[4]),
            ..settings(dir.path())
        };
        let pages = issue_pages(&index_job, &fetcher, &settings).await.unwrap();
        assert_eq!(
            pages,
            vec![(
                "https://j.example/i/584".to_string(),
                IssueRef { volume: 58, issue: Some(4) }
            )]
        );

        let settings = RunSettings {
            selection: IssueSelection::explicit(&[59], &[]),
            ..settings
        };
        let pages = issue_pages(&index_job, &fetcher, &settings).await.unwrap();
        let urls: Vec<_> = pages.iter().map(|(url, _)| url.as_str()).collect();
        assert_eq!(urls, vec!["https://j.example/i/591", "https://j.example/i/592"]);
    }

    #[tokio::test]
    async fn test_unsupported_journal_is_checked_before_any_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = site();
        let err = issue_pages(&job("ej", IssueLayout::NonResetting, None), &fetcher, &settings(dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, EnumerateError::UnsupportedJournal { .. }));
        assert!(fetcher.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_batch_skips_failing_journals_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![
            job("ej", IssueLayout::NonResetting, None),
            job("missing", IssueLayout::PerVolume(2), None),
            job("jpe", IssueLayout::PerVolume(2), Some(10)),
        ];

        let report = run_batch(&jobs, &site(), &settings(dir.path())).await;
        assert_eq!(report.completed.len(), 1);
        assert_eq!(report.completed[0].journal, "uchicago/jpe");
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].journal, "uchicago/ej");
        assert!(report.skipped[0].unsupported);
        assert_eq!(report.skipped[1].journal, "uchicago/missing");
        assert!(!report.skipped[1].unsupported);
    }
}
