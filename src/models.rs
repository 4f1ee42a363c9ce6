//! Data models for the listing API and the news items it yields.
//!
//! - [`ListingEnvelope`]: wire shape of one listing page
//! - [`ListingEntry`]: the fields we consume from one listed article
//! - [`NewsItem`]: the immutable record handed to the article fetcher
//! - [`NewsListExport`]: what `--news-list-output` writes
//!
//! Field names follow the site's JSON (`no`, `time`) on the wire and are
//! renamed on the Rust side.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One listing page: `{"code": 200, "data": [...]}`.
///
/// Unknown fields are ignored. `data` is required; a page without it is
/// malformed.
#[derive(Debug, Deserialize)]
pub struct ListingEnvelope {
    /// Site status code. Its type is not stable across pages, so it is kept raw.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    pub data: ListingData,
}

/// The `data` member of a listing page.
///
/// The first page carries a JSON array. Later pages can carry an object keyed
/// by running index (`{"20": {...}, "21": {...}}`).
///
/// Elements stay raw until [`ListingData::into_entries`] so that a missing
/// field is reported by name instead of as an untagged-enum mismatch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListingData {
    List(Vec<serde_json::Value>),
    Keyed(BTreeMap<String, serde_json::Value>),
}

impl ListingData {
    /// Entries in page order. Keyed entries are sorted by numeric key, with
    /// non-numeric keys last in lexical order.
    ///
    /// # Errors
    ///
    /// Fails on the first element lacking one of `no`, `title`, `url`, `time`.
    pub fn into_entries(self) -> Result<Vec<ListingEntry>, serde_json::Error> {
        let raw: Vec<serde_json::Value> = match self {
            ListingData::List(values) => values,
            ListingData::Keyed(map) => {
                let mut keyed: Vec<(String, serde_json::Value)> = map.into_iter().collect();
                keyed.sort_by_key(|(k, _)| k.parse::<u64>().unwrap_or(u64::MAX));
                keyed.into_iter().map(|(_, value)| value).collect()
            }
        };
        raw.into_iter().map(serde_json::from_value).collect()
    }
}

/// The four fields of a listed article that the pipeline needs. All are
/// required.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    pub no: String,
    pub title: String,
    pub url: String,
    pub time: String,
}

/// A breaking-news article reference.
///
/// `published_at` is whatever the site printed (`"16:48"` for same-day items,
/// `"2024/11/23 17:59"` for older ones) and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub published_at: String,
}

impl From<ListingEntry> for NewsItem {
    fn from(entry: ListingEntry) -> Self {
        Self {
            id: entry.no,
            title: entry.title,
            url: entry.url,
            published_at: entry.time,
        }
    }
}

/// Snapshot of the news list fetched during one run.
#[derive(Debug, Serialize)]
pub struct NewsListExport<'a> {
    pub fetched_at: DateTime<Local>,
    pub start_page: u32,
    pub end_page: u32,
    pub items: &'a [NewsItem],
}
