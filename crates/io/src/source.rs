//! Blacklist locators: resolve a sheet link into a CSV export URL and read
//! the table behind it.
//!
//! A locator is either a remote URL (`http`/`https`) or a local file path.
//! Remote sheet links are rewritten to their CSV export form:
//!
//! - already contains `/export?` → unchanged
//! - contains `/d/<id>/` → `https://docs.google.com/spreadsheets/d/<id>/export?format=csv&gid=<gid>`
//!   where `<gid>` comes from `gid=<digits>` (default `0`)
//! - anything else → unchanged (may fail at fetch time)

use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use scrubgrid_engine::config::PLACEHOLDER_SOURCE;
use scrubgrid_engine::table::Table;
use scrubgrid_engine::ScrubError;

// ── Constants ───────────────────────────────────────────────────────

pub const EXPORT_MARKER: &str = "/export?";
const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";
const TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("sgrid/", env!("CARGO_PKG_VERSION"));

static SHEET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/d/([A-Za-z0-9_-]+)/").expect("sheet id pattern"));
static GID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"gid=(\d+)").expect("gid pattern"));

// ── Locator resolution ──────────────────────────────────────────────

/// Rewrite a sheet link into a fetchable CSV export locator. Best effort:
/// locators without an extractable id pass through unchanged.
pub fn resolve_locator(locator: &str) -> String {
    if locator.contains(EXPORT_MARKER) {
        return locator.to_string();
    }

    let Some(id) = SHEET_ID_RE.captures(locator).and_then(|c| c.get(1)) else {
        return locator.to_string();
    };
    let gid = GID_RE
        .captures(locator)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("0");

    format!("{EXPORT_BASE}/{}/export?format=csv&gid={gid}", id.as_str())
}

// ── Source ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlacklistSource {
    /// Resolved URL, ready to fetch.
    Remote(String),
    Local(PathBuf),
}

impl BlacklistSource {
    pub fn parse(locator: &str) -> Result<Self, ScrubError> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(ScrubError::config("blacklist locator is empty"));
        }
        if locator == PLACEHOLDER_SOURCE {
            return Err(ScrubError::config(
                "blacklist locator is still the placeholder; supply a sheet URL or file path",
            ));
        }

        let lower = locator.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let resolved = resolve_locator(locator);
            url::Url::parse(&resolved).map_err(|e| {
                ScrubError::config(format!("blacklist locator '{locator}' is not a valid URL: {e}"))
            })?;
            Ok(Self::Remote(resolved))
        } else {
            Ok(Self::Local(PathBuf::from(locator)))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Local(path) => path.display().to_string(),
        }
    }

    /// Read the blacklist table. One attempt; failures surface as-is.
    pub fn load(&self) -> Result<Table, ScrubError> {
        match self {
            Self::Remote(url) => BlacklistFetcher::new()?.fetch(url),
            Self::Local(path) => crate::load_table(path),
        }
    }
}

// ── Fetch ───────────────────────────────────────────────────────────

/// Blocking HTTP reader for remote blacklists. No retry, no caching.
pub struct BlacklistFetcher {
    http: reqwest::blocking::Client,
}

impl BlacklistFetcher {
    pub fn new() -> Result<Self, ScrubError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScrubError::io(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    pub fn fetch(&self, url: &str) -> Result<Table, ScrubError> {
        log::info!("fetching blacklist from {url}");

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| ScrubError::io(format!("blacklist fetch failed for {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(ScrubError::io(format!(
                "blacklist fetch failed for {url}: HTTP {}{}",
                status.as_u16(),
                if snippet.trim().is_empty() {
                    String::new()
                } else {
                    format!(": {}", snippet.trim())
                }
            )));
        }

        // A private sheet answers 200 with a sign-in page instead of CSV.
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"));
        if is_html {
            return Err(ScrubError::io(format!(
                "blacklist fetch from {url} returned HTML, not CSV (is the sheet shared publicly?)"
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| ScrubError::io(format!("cannot read blacklist body from {url}: {e}")))?;

        let table = crate::csv::import_bytes(bytes.to_vec())
            .map_err(|e| ScrubError::io(format!("blacklist from {url}: {e}")))?;
        log::info!("blacklist: {} rows, columns [{}]", table.len(), table.columns.join(", "));
        Ok(table)
    }
}
