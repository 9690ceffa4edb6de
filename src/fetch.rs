//! Page loading behind the [`PageFetcher`] capability.
//!
//! Everything downstream works on a loaded [`Document`] and never talks to
//! the network directly, so each stage can be tested against in-memory pages.
//!
//! # Architecture
//!
//! - [`PageFetcher`]: core trait, `fetch(url, settle_delay) -> Document`
//! - [`HttpFetcher`]: reqwest-backed implementation used by the binary
//! - [`Document`]: parsed page with `find` / `find_all` / `text` / `attribute`
//! - [`Locator`]: a CSS selector validated when a profile is built
//!
//! # Settle Delay
//!
//! Each fetch waits for the configured settle delay before requesting the
//! page. Runs are sequential, so this doubles as a fixed pause between
//! requests to the same publisher.

use crate::error::{ConfigError, FetchError};
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use url::Url;

/// Elements whose boundaries become line breaks in extracted text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "br", "dd", "div", "dl", "dt", "figcaption", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "li", "ol", "p", "section", "table", "td", "th", "tr",
    "ul",
];

/// A CSS selector together with the source text it was parsed from.
#[derive(Clone, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    source: String,
    selector: Selector,
}

impl Locator {
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let selector = Selector::parse(source).map_err(|e| ConfigError::Selector {
            selector: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl TryFrom<String> for Locator {
    type Error = ConfigError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Locator::parse(&source)
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.source
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Locator").field(&self.source).finish()
    }
}

impl PartialEq for Locator {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A loaded and parsed page.
pub struct Document {
    url: Url,
    html: Html,
}

impl Document {
    pub fn parse(url: &str, body: &str) -> Result<Self, FetchError> {
        let url = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self {
            url,
            html: Html::parse_document(body),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// First element matching `locator`.
    pub fn find(&self, locator: &Locator) -> Option<ElementRef<'_>> {
        self.html.select(&locator.selector).next()
    }

    /// All elements matching `locator`, in document order.
    pub fn find_all(&self, locator: &Locator) -> Vec<ElementRef<'_>> {
        self.html.select(&locator.selector).collect()
    }

    /// First descendant of `element` matching `locator`.
    pub fn find_within<'a>(element: ElementRef<'a>, locator: &Locator) -> Option<ElementRef<'a>> {
        element.select(&locator.selector).next()
    }

    pub fn find_all_within<'a>(element: ElementRef<'a>, locator: &Locator) -> Vec<ElementRef<'a>> {
        element.select(&locator.selector).collect()
    }

    /// Rendered text of an element.
    ///
    /// Text nodes are concatenated in document order; block-level element
    /// boundaries become `\n`, and script/style content is skipped. The
    /// result is trimmed but otherwise left for the caller to normalize.
    pub fn text(element: ElementRef<'_>) -> String {
        let mut out = String::new();
        push_text(element, &mut out);
        out.trim().to_string()
    }

    pub fn attribute(element: ElementRef<'_>, name: &str) -> Option<String> {
        element.value().attr(name).map(str::to_string)
    }
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child.value().name();
                if matches!(name, "script" | "style") {
                    continue;
                }
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    break_line(out);
                }
                push_text(child, out);
                if block {
                    break_line(out);
                }
            }
            _ => {}
        }
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document").field("url", &self.url.as_str()).finish()
    }
}

/// Capability to load a page.
///
/// Implementors return a parsed [`Document`] or a [`FetchError`]; callers
/// decide whether a failure skips one URL or aborts a journal.
pub trait PageFetcher {
    async fn fetch(&self, url: &str, settle_delay: Duration) -> Result<Document, FetchError>;
}

/// Plain HTTP fetcher built on a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given user agent and per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str, settle_delay: Duration) -> Result<Document, FetchError> {
        sleep(settle_delay).await;

        let t0 = Instant::now();
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Page request rejected");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        // Redirects may land on a different host; resolve links against it.
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(request_error)?;
        debug!(
            %url,
            %final_url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );

        Document::parse(&final_url, &body)
    }
}
