//! Utility functions for string handling and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for log previews
//! - Slugs for file names and display names derived from slugs
//! - File system validation for the data directory

use std::fs as stdfs;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Words left in lower case when a journal slug is turned into a name.
const MINOR_WORDS: &[&str] = &["of", "and", "to"];

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, on a character boundary,
/// with an ellipsis and byte count indicator appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Returns
///
/// The original string if it fits, otherwise a truncated version with
/// `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Convert a journal key to a file-name-safe slug.
///
/// Lowercases the text, drops anything but alphanumerics, spaces, `-` and
/// `_`, and replaces spaces with hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Journal of Finance"), "journal-of-finance");
/// assert_eq!(slugify("qje/2024"), "qje2024");
/// ```
pub fn slugify(key: &str) -> String {
    key.to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-' && c != '_', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Capitalize the first character of a string.
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Human-readable journal name from a hyphenated slug.
///
/// Every word is capitalized except "of", "and" and "to".
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     display_name_from_slug("journal-of-monetary-economics"),
///     "Journal of Monetary Economics"
/// );
/// ```
pub fn display_name_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            if MINOR_WORDS.contains(&w) {
                w.to_string()
            } else {
                upcase(w)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and immediately
/// deletes a scratch file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    let check_path = path.join("..__write_check__");
    stdfs::File::create(&check_path)?;
    let _ = stdfs::remove_file(&check_path);
    info!("Data directory is writable");
    Ok(())
}
