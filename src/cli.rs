//! Command-line interface definitions for Journal Harvest.
//!
//! Every option can also be set through the environment variable named in
//! its `env` attribute.

use crate::enumerate::IssueSelection;
use crate::models::Publisher;
use clap::Parser;
use std::path::PathBuf;

fn parse_publisher(name: &str) -> Result<Publisher, String> {
    Publisher::from_name(name).ok_or_else(|| {
        let known: Vec<_> = Publisher::ALL.iter().map(Publisher::id).collect();
        format!("unknown publisher `{name}` (expected one of: {})", known.join(", "))
    })
}

/// Command-line arguments for a harvest run.
///
/// # Examples
///
/// ```sh
/// # Rescan the last two volumes of every configured journal
/// journal_harvest --config journals.yaml --data-dir ./data
///
/// # One journal, deeper rescan, four paper pages in flight
/// journal_harvest --publisher wiley --journal jf --trailing-volumes 5 --concurrency 4
///
/// # Backfill volume 58, issue 4 of one journal
/// journal_harvest --publisher jstor --journal jeconlite --volumes 58 --issues 4
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML journal table
    #[arg(short, long, env = "HARVEST_CONFIG", default_value = "journals.yaml")]
    pub config: PathBuf,

    /// Directory holding the CSV stores and per-run JSON dumps
    #[arg(short, long, env = "HARVEST_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Number of most recent volumes to (re)scan per journal
    #[arg(short, long, env = "HARVEST_TRAILING_VOLUMES", default_value_t = 2)]
    pub trailing_volumes: u32,

    /// Scan exactly these volumes (comma separated) instead of the trailing ones
    #[arg(long, env = "HARVEST_VOLUMES", value_delimiter = ',')]
    pub volumes: Vec<u32>,

    /// Issues to scan within --volumes; every issue when omitted
    #[arg(long, env = "HARVEST_ISSUES", value_delimiter = ',', requires = "volumes")]
    pub issues: Vec<u32>,

    /// Seconds to wait before each page request
    #[arg(long, env = "HARVEST_SETTLE_DELAY_SECS", default_value_t = 3)]
    pub settle_delay_secs: u64,

    /// Paper pages loaded at once (1 = sequential)
    #[arg(long, env = "HARVEST_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// Only run journals of this publisher
    #[arg(short, long, env = "HARVEST_PUBLISHER", value_parser = parse_publisher)]
    pub publisher: Option<Publisher>,

    /// Only run the journal with this config key
    #[arg(short, long, env = "HARVEST_JOURNAL")]
    pub journal: Option<String>,
}

impl Cli {
    /// Explicit volumes when given, otherwise the trailing window.
    pub fn selection(&self) -> IssueSelection {
        if self.volumes.is_empty() {
            IssueSelection::Trailing(self.trailing_volumes)
        } else {
            IssueSelection::explicit(&self.volumes, &self.issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["journal_harvest"]);

        assert_eq!(cli.config, PathBuf::from("journals.yaml"));
        assert_eq!(cli.data_dir, PathBuf::from("data"));
        assert_eq!(cli.trailing_volumes, 2);
        assert_eq!(cli.settle_delay_secs, 3);
        assert_eq!(cli.concurrency, 1);
        assert!(cli.publisher.is_none());
        assert!(cli.journal.is_none());
        assert_eq!(cli.selection(), IssueSelection::Trailing(2));
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "journal_harvest",
            "--config",
            "/etc/journals.yaml",
            "--data-dir",
            "/tmp/data",
            "--trailing-volumes",
            "5",
            "--settle-delay-secs",
            "0",
            "--concurrency",
            "4",
        ]);

        assert_eq!(cli.config, PathBuf::from("/etc/journals.yaml"));
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/data"));
        assert_eq!(cli.trailing_volumes, 5);
        assert_eq!(cli.settle_delay_secs, 0);
        assert_eq!(cli.concurrency, 4);
    }

    #[test]
    fn test_cli_short_flags_and_filters() {
        let cli = Cli::parse_from(["journal_harvest", "-d", "/tmp/d", "-p", "Chicago", "-j", "jpe"]);

        assert_eq!(cli.data_dir, PathBuf::from("/tmp/d"));
        assert_eq!(cli.publisher, Some(Publisher::UChicago));
        assert_eq!(cli.journal.as_deref(), Some("jpe"));
    }

    #[test]
    fn test_cli_explicit_volumes_and_issues() {
        let cli = Cli::parse_from(["journal_harvest", "--volumes", "59,58", "--issues", "4"]);
        assert_eq!(
            cli.selection(),
            IssueSelection::Explicit {
                volumes: vec![58, 59],
                issues: vec![4]
            }
        );

        let cli = Cli::parse_from(["journal_harvest", "--volumes", "58"]);
        assert_eq!(cli.selection(), IssueSelection::explicit(&[58], &[]));

        assert!(Cli::try_parse_from(["journal_harvest", "--issues", "4"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_publisher() {
        assert!(Cli::try_parse_from(["journal_harvest", "--publisher", "nature"]).is_err());
    }
}
