//! Journal table loaded from YAML.
//!
//! ```yaml
//! http:
//!   user_agent: "journal_harvest/0.1"
//!   timeout_secs: 60
//! publishers:
//!   wiley:
//!     journals:
//!       jf:
//!         id: 15406261
//!         name: Journal of Finance
//!         issues: 6
//!   elsevier:
//!     journals:
//!       journal-of-monetary-economics:
//!         issues: none
//!         latest_volume: 142
//!     selectors:
//!       abstract: "#abstracts"
//! ```
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `id` | value substituted for `{key}` in URLs; defaults to the journal key |
//! | `name` | `Journal_Name` column value; defaults to a name built from the key |
//! | `issues` | issues per volume, `none` for one page per volume, or `non-resetting` |
//! | `latest_volume` | newest volume; looked up online when absent |
//! | `selectors` | per-publisher selector overrides |

use crate::error::ConfigError;
use crate::models::{IssueLayout, JournalProfile, Publisher};
use crate::pipeline::JournalJob;
use crate::profiles::SelectorOverrides;
use crate::publishers;
use crate::utils::display_name_from_slug;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument};

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JournalsConfig {
    #[serde(default)]
    pub http: HttpSettings,
    pub publishers: BTreeMap<Publisher, PublisherConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    pub journals: BTreeMap<String, JournalEntry>,
    #[serde(default)]
    pub selectors: SelectorOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JournalEntry {
    pub id: Option<JournalId>,
    pub name: Option<String>,
    pub issues: IssuesSetting,
    pub latest_volume: Option<u32>,
}

/// Journal id as written in YAML: a slug or a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum JournalId {
    Number(u64),
    Text(String),
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalId::Number(n) => write!(f, "{n}"),
            JournalId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IssuesSetting {
    Count(u32),
    Keyword(IssuesKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssuesKeyword {
    None,
    NonResetting,
}

impl From<IssuesSetting> for IssueLayout {
    fn from(setting: IssuesSetting) -> Self {
        match setting {
            IssuesSetting::Count(0) | IssuesSetting::Keyword(IssuesKeyword::None) => {
                IssueLayout::Unsubdivided
            }
            IssuesSetting::Count(n) => IssueLayout::PerVolume(n),
            IssuesSetting::Keyword(IssuesKeyword::NonResetting) => IssueLayout::NonResetting,
        }
    }
}

impl JournalEntry {
    pub fn profile(&self, publisher: Publisher, key: &str) -> JournalProfile {
        JournalProfile {
            publisher,
            journal_key: key.to_string(),
            url_key: self
                .id
                .as_ref()
                .map_or_else(|| key.to_string(), |id| id.to_string()),
            display_name: self
                .name
                .clone()
                .unwrap_or_else(|| display_name_from_slug(key)),
            issue_layout: self.issues.into(),
            latest_volume: self.latest_volume,
        }
    }
}

impl JournalsConfig {
    /// Read and validate a YAML journal table.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Read`] if the file cannot be read
    /// - [`ConfigError::Yaml`] on malformed YAML, unknown keys or invalid selectors
    /// - [`ConfigError::DuplicateJournalName`] on two journals with one name
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        info!(
            publishers = config.publishers.len(),
            journals = config.publishers.values().map(|p| p.journals.len()).sum::<usize>(),
            "Loaded journal config"
        );
        Ok(config)
    }

    /// Parse a YAML journal table.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Yaml`] on malformed YAML, unknown keys or invalid selectors
    /// - [`ConfigError::DuplicateJournalName`] if two journals of one publisher
    ///   would write the same `Journal_Name`
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.check_unique_names()?;
        Ok(config)
    }

    /// CSV rows identify a journal by its publisher and display name.
    fn check_unique_names(&self) -> Result<(), ConfigError> {
        for (&publisher, publisher_config) in &self.publishers {
            let mut seen: HashMap<String, &str> = HashMap::new();
            for (key, entry) in &publisher_config.journals {
                let name = entry.profile(publisher, key).display_name;
                if let Some(first) = seen.get(&name) {
                    return Err(ConfigError::DuplicateJournalName {
                        publisher: publisher.id().to_string(),
                        name,
                        first: first.to_string(),
                        second: key.clone(),
                    });
                }
                seen.insert(name, key);
            }
        }
        Ok(())
    }

    /// Jobs for the configured journals, optionally narrowed to one
    /// publisher and/or one journal key.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownJournal`] if `journal` is given but matches nothing
    /// - [`ConfigError::Selector`] / [`ConfigError::Regex`] if a built-in profile is invalid
    pub fn jobs(
        &self,
        publisher: Option<Publisher>,
        journal: Option<&str>,
    ) -> Result<Vec<JournalJob>, ConfigError> {
        let mut jobs = Vec::new();
        for (&name, publisher_config) in &self.publishers {
            if publisher.is_some_and(|p| p != name) {
                continue;
            }
            let mut spec = publishers::spec(name)?;
            spec.selectors.apply_overrides(&publisher_config.selectors);

            for (key, entry) in &publisher_config.journals {
                if journal.is_some_and(|j| j != key) {
                    continue;
                }
                let profile = entry.profile(name, key);
                debug!(journal = %profile.label(), layout = ?profile.issue_layout, "Configured journal");
                jobs.push(JournalJob {
                    profile,
                    spec: spec.clone(),
                });
            }
        }

        if let (Some(journal), true) = (journal, jobs.is_empty()) {
            return Err(ConfigError::UnknownJournal(journal.to_string()));
        }
        Ok(jobs)
    }
}
