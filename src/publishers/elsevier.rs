//! Elsevier (ScienceDirect) journals.
//!
//! Issue pages live at `/journal/{slug}/vol/{volume}/issue/{issue}`;
//! journals without issues list each volume under `/vol/{volume}/suppl/C`.
//! Paper pages carry "Highlights" bullets before the abstract and glue
//! footnote markers onto author names.

use super::{IssueSource, PublisherSpec, landing_page};
use crate::enumerate::UrlTemplate;
use crate::error::ConfigError;
use crate::normalize::TextRules;
use crate::profiles::SelectorProfile;

pub fn spec() -> Result<PublisherSpec, ConfigError> {
    let mut selectors = SelectorProfile::new(
        "#screen-reader-main-title",
        "#author-group",
        "#abstracts",
        ".publication-volume .text-xs",
        "h3 > a",
    )?;
    selectors.title_rules = TextRules {
        ascii_only: true,
        ..TextRules::default()
    };
    selectors.author_rules = TextRules {
        strip_phrases: vec!["Author links open overlay panel".to_string()],
        strip_footnote_digits: true,
        ..TextRules::default()
    };
    selectors.abstract_rules = TextRules {
        strip_phrases: vec![
            "Highlights\n".to_string(),
            "Abstract\n".to_string(),
            "•".to_string(),
        ],
        strip_leading: vec!["Abstract".to_string()],
        ..TextRules::default()
    };

    Ok(PublisherSpec {
        selectors,
        issues: IssueSource::Template(
            UrlTemplate::new("https://www.sciencedirect.com/journal/{key}/vol/{volume}/issue/{issue}")
                .with_volume_only("https://www.sciencedirect.com/journal/{key}/vol/{volume}/suppl/C"),
        ),
        latest_volume: Some(landing_page(
            "https://www.sciencedirect.com/journal/{key}/issues",
            ".js-issue-item-link",
            r"Volume (\d+)",
        )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Document;
    use crate::models::{IssueRef, PaperLink};

    const PAPER: &str = r#"<html><body>
        <h1 id="screen-reader-main-title"><span>Inflation—expectations: a “new” view</span></h1>
        <div id="author-group"><span>Author links open overlay panel</span>
            <a><span>Jane Doe</span><sup>1</sup> <sup>2</sup></a>,
            <a><span>John Roe</span><sup>3</sup></a></div>
        <div id="abstracts">
            <div><h2>Highlights</h2><ul><li>• Expectations matter.</li></ul></div>
            <div><h2>Abstract</h2><p>We revisit inflation expectations.</p></div>
        </div>
        <div class="publication-volume"><div class="text-xs">Volume 142, March 2024, 103530</div></div>
    </body></html>"#;

    #[test]
    fn test_paper_page() {
        let spec = spec().unwrap();
        let doc = Document::parse("https://www.sciencedirect.com/science/article/pii/S1", PAPER).unwrap();
        let record = spec.selectors.extract(&doc).unwrap();
        assert_eq!(record.title, "Inflationexpectations a new view");
        assert_eq!(record.authors, "Jane Doe, John Roe");
        assert_eq!(
            record.abstract_text,
            "Expectations matter. We revisit inflation expectations."
        );
        assert_eq!(record.volume_issue, "Volume 142, Issue 1");
    }

    #[test]
    fn test_issue_page_links() {
        let spec = spec().unwrap();
        let doc = Document::parse(
            "https://www.sciencedirect.com/journal/journal-of-monetary-economics/vol/142/suppl/C",
            r#"<h3><a href="/science/article/pii/S1">One</a></h3><h3><span>Editorial</span></h3>"#,
        )
        .unwrap();
        assert_eq!(
            spec.selectors.locate_paper_links(&doc),
            vec![PaperLink("https://www.sciencedirect.com/science/article/pii/S1".to_string())]
        );
    }

    #[test]
    fn test_templates() {
        let IssueSource::Template(template) = spec().unwrap().issues else {
            panic!("elsevier uses URL templates");
        };
        assert_eq!(
            template.render("journal-of-monetary-economics", IssueRef { volume: 142, issue: None }),
            Some("https://www.sciencedirect.com/journal/journal-of-monetary-economics/vol/142/suppl/C".to_string())
        );
        assert_eq!(
            template.render("jfe", IssueRef { volume: 151, issue: Some(2) }),
            Some("https://www.sciencedirect.com/journal/jfe/vol/151/issue/2".to_string())
        );
    }
}
