//! Liberty Times Net (news.ltn.com.tw) breaking-news scraper.
//!
//! # Listing
//!
//! `GET {base}/{category}/{page}` returns a JSON envelope of up to 20 items.
//! Pages are walked in ascending order; a failed page is logged and skipped.
//!
//! # Articles
//!
//! The article body lives in `<div class="text boxTitle boxText">` as a run
//! of `<p>` elements, interleaved with promotional paragraphs that are
//! dropped by substring match.

use crate::config::PipelineConfig;
use crate::error::FetchError;
use crate::http::FetchText;
use crate::models::{ListingEnvelope, NewsItem};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};

/// Paragraphs containing any of these are promotional, not article text.
pub const BOILERPLATE_NEEDLES: [&str; 3] = ["點我下載APP", "按我看活動辦法", "請繼續往下閱讀..."];

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[class="text boxTitle boxText"]"#).unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Fetch every listing page in `[start_page, end_page]` and collect the
/// news items, in page order.
///
/// Exactly one request is issued per page. A page that fails (transport
/// error, non-200, malformed JSON, missing field) contributes nothing and
/// is never retried.
///
/// # Returns
///
/// All items from the pages that succeeded. An empty range yields nothing.
#[instrument(level = "info", skip(client, config))]
pub async fn index_articles<F: FetchText>(
    client: &F,
    config: &PipelineConfig,
    start_page: u32,
    end_page: u32,
) -> Vec<NewsItem> {
    let mut items = Vec::new();
    for page in start_page..=end_page {
        match fetch_listing_page(client, config, page).await {
            Ok(page_items) => {
                info!(page, count = page_items.len(), "Fetched listing page");
                items.extend(page_items);
            }
            Err(e) => {
                error!(page, error = %e, "Failed to fetch listing page; skipping");
            }
        }
    }
    info!(count = items.len(), "Indexed LTN news items");
    items
}

/// Fetch and decode one listing page.
async fn fetch_listing_page<F: FetchText>(
    client: &F,
    config: &PipelineConfig,
    page: u32,
) -> Result<Vec<NewsItem>, FetchError> {
    let url = config.listing_url(page)?;
    let body = client.get_text(url.as_str()).await?;
    parse_listing(&body)
}

/// Decode a listing page body into news items.
pub fn parse_listing(body: &str) -> Result<Vec<NewsItem>, FetchError> {
    let envelope: ListingEnvelope = serde_json::from_str(body).map_err(|e| {
        debug!(preview = %truncate_for_log(body, 200), "Listing body did not parse");
        e
    })?;
    if let Some(code) = &envelope.code {
        debug!(%code, "Listing envelope code");
    }
    let entries = envelope.data.into_entries()?;
    Ok(entries.into_iter().map(NewsItem::from).collect())
}

/// Fetch the body text of every item, one at a time, in order.
///
/// Failed fetches are logged and contribute an empty string, so the output
/// always has one entry per input item.
#[instrument(level = "info", skip_all, fields(count = items.len()))]
pub async fn fetch_articles<F: FetchText>(client: &F, items: &[NewsItem]) -> Vec<String> {
    let bodies: Vec<String> = stream::iter(items)
        .then(|item| async move {
            info!(title = %item.title, published_at = %item.published_at, "Fetching article");
            match fetch_article(client, item).await {
                Ok(body) if body.is_empty() => {
                    warn!(url = %item.url, "Article produced no content");
                    body
                }
                Ok(body) => body,
                Err(e) => {
                    error!(url = %item.url, error = %e, "Article fetch failed");
                    String::new()
                }
            }
        })
        .collect()
        .await;

    let with_content = bodies.iter().filter(|b| !b.is_empty()).count();
    info!(fetched = with_content, total = bodies.len(), "Fetched article contents");
    bodies
}

/// Fetch a single article and extract its body.
///
/// A page without the body container is `Ok("")`, not an error.
#[instrument(level = "debug", skip_all, fields(url = %item.url))]
pub async fn fetch_article<F: FetchText>(client: &F, item: &NewsItem) -> Result<String, FetchError> {
    let html = client.get_text(&item.url).await?;
    let body = extract_body(&html);
    debug!(chars = body.chars().count(), "Parsed LTN article");
    Ok(body)
}

/// Pull the article text out of an LTN article page.
///
/// Each paragraph's text nodes are trimmed and concatenated. Empty and
/// promotional paragraphs are dropped, the rest are joined with one space.
pub fn extract_body(html: &str) -> String {
    let document = Html::parse_document(html);
    let Some(container) = document.select(&BODY_SELECTOR).next() else {
        debug!("No article body container");
        return String::new();
    };

    let paragraphs: Vec<String> = container
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| p.text().map(str::trim).collect::<String>())
        .filter(|text| !text.is_empty() && !is_boilerplate(text))
        .collect();
    paragraphs.join(" ")
}

pub fn is_boilerplate(text: &str) -> bool {
    BOILERPLATE_NEEDLES.iter().any(|needle| text.contains(needle))
}
