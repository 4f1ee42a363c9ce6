//! # ltn_wordcloud
//!
//! A batch pipeline that fetches breaking news from Liberty Times Net
//! (news.ltn.com.tw), segments the Chinese article text with jieba, counts
//! word frequencies and renders a word cloud.
//!
//! ## Usage
//!
//! ```sh
//! ltn_wordcloud --end-page 3 --stopwords stopwords.txt --font NotoSansTC-Regular.ttf
//! ```
//!
//! ## Architecture
//!
//! One run is strictly sequential:
//! 1. **Resources**: load stopwords, the segmenter and the font (fatal on failure)
//! 2. **Indexing**: walk the JSON listing pages for news items
//! 3. **Fetching**: download each article and extract its body text
//! 4. **Analysis**: segment, filter and count the corpus
//! 5. **Output**: write the frequency table, then the word-cloud image

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod http;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod text;
mod utils;

use cli::Cli;
use config::PipelineConfig;
use http::{HttpClient, Throttled};
use pipeline::Resources;
use utils::ensure_parent_writable;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ltn_wordcloud starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = PipelineConfig::resolve(&args).map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    // Resources and output locations are checked before any request goes out.
    let resources = Resources::load(&config).map_err(|e| {
        error!(error = %e, "Failed to load resources");
        e
    })?;

    let mut outputs = vec![&config.frequency_output, &config.image_output];
    outputs.extend(config.news_list_output.as_ref());
    for path in outputs {
        if let Err(e) = ensure_parent_writable(path).await {
            error!(
                path = %path.display(),
                error = %e,
                "Output location is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let client = Throttled::new(HttpClient::from_config(&config)?, config.delay());

    let summary = match pipeline::run(&client, &config, &resources).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Pipeline failed");
            return Err(e);
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        news_items = summary.news_items,
        articles_with_content = summary.articles_with_content,
        total_tokens = summary.total_tokens,
        distinct_tokens = summary.distinct_tokens,
        table_entries = summary.table_entries,
        words_drawn = summary.words_drawn,
        frequency_output = %config.frequency_output.display(),
        image_output = %config.image_output.display(),
        "All tasks completed"
    );

    Ok(())
}
