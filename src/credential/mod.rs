//! Credential scraping: pull the one-time generated admin password out of an
//! instance's startup log.

mod scrape;

pub use scrape::{ScrapePolicy, scrape};

use std::sync::LazyLock;

use regex::Regex;

static PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"password: (\S+)").expect("password pattern is valid"));

/// What the scraper observed in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOutcome {
    Found(String),
    /// The single snapshot had no credential line. Expected whenever the
    /// data volume already existed before this run.
    NotFound,
    /// Bounded polling ran out of time without seeing the line.
    TimedOut,
}

/// First token following `password: `, up to the next whitespace.
pub fn extract_password(log: &str) -> Option<&str> {
    PASSWORD_RE
        .captures(log)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
