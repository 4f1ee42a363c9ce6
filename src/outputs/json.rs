//! JSON export of the fetched news list.
//!
//! Written only when `news_list_output` is configured. The file records what
//! the run saw, stamped with the local fetch time:
//!
//! ```json
//! {
//!   "fetched_at": "2024-11-24T17:02:11.123+08:00",
//!   "start_page": 1,
//!   "end_page": 3,
//!   "items": [{ "id": "4873738", "title": "...", "url": "...", "published_at": "16:48" }]
//! }
//! ```

use crate::models::{NewsItem, NewsListExport};
use chrono::Local;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `items` with the page range and the current local time.
#[instrument(level = "info", skip(items), fields(path = %path.display(), count = items.len()))]
pub async fn write_news_list(
    items: &[NewsItem],
    start_page: u32,
    end_page: u32,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let export = NewsListExport {
        fetched_at: Local::now(),
        start_page,
        end_page,
        items,
    };
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(path, json).await?;
    info!("Wrote news list JSON");
    Ok(())
}
