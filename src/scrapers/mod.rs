//! News source scrapers.
//!
//! There is a single source, Liberty Times Net, scraped in two phases:
//!
//! 1. **Indexing**: walk the paginated JSON listing to collect news items
//! 2. **Fetching**: download each article page and extract its body text
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Liberty Times Net | [`ltn`] | JSON listing + HTML scraping | Breaking news, one category per run |
//!
//! Scrapers are generic over [`crate::http::FetchText`] and run strictly
//! sequentially. Failures are logged and skipped, never retried.

pub mod ltn;
