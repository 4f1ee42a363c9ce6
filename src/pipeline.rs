//! The batch driver: list → articles → tokens → table + image.
//!
//! Per-page and per-article failures are logged and skipped inside the
//! scrapers. Everything that reaches this module as an `Err` is fatal.

use crate::config::PipelineConfig;
use crate::http::FetchText;
use crate::models::NewsItem;
use crate::outputs::{frequency_table, json};
use crate::outputs::wordcloud::WordCloudRenderer;
use crate::scrapers::ltn;
use crate::text::frequency;
use crate::text::tokenizer::display_string;
use crate::text::{StopwordSet, Tokenizer};
use std::error::Error;
use tracing::{info, instrument, warn};

/// Inputs that must load before any network traffic.
pub struct Resources {
    pub tokenizer: Tokenizer,
    pub renderer: WordCloudRenderer,
}

impl Resources {
    /// Load stopwords, the segmenter (plus user dictionary) and the font.
    ///
    /// # Errors
    ///
    /// Any missing or unreadable resource.
    #[instrument(level = "info", skip_all)]
    pub fn load(config: &PipelineConfig) -> Result<Self, Box<dyn Error>> {
        let stopwords = StopwordSet::load(&config.stopwords_path)?;
        let mut tokenizer = Tokenizer::new(stopwords);
        if let Some(path) = &config.user_dict_path {
            tokenizer.load_user_dict(path)?;
        }
        let renderer = WordCloudRenderer::from_font_file(&config.font_path, config.render.clone())?;
        Ok(Self { tokenizer, renderer })
    }
}

/// What the token step produced.
#[derive(Debug)]
pub struct Analysis {
    /// Filtered tokens joined by single spaces, fed to the renderer.
    pub display: String,
    /// Every distinct token, highest count first, ties in first-seen order.
    pub ranking: Vec<(String, usize)>,
}

impl Analysis {
    pub fn total_tokens(&self) -> usize {
        self.ranking.iter().map(|(_, c)| c).sum()
    }

    /// The first `n` ranked entries; `None` keeps all.
    pub fn top(&self, n: Option<usize>) -> &[(String, usize)] {
        let n = n.map_or(self.ranking.len(), |n| n.min(self.ranking.len()));
        &self.ranking[..n]
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub news_items: usize,
    pub articles_with_content: usize,
    pub total_tokens: usize,
    pub distinct_tokens: usize,
    pub table_entries: usize,
    pub words_drawn: usize,
}

/// The fetched news list and the text gathered from it.
#[derive(Debug)]
pub struct Corpus {
    pub items: Vec<NewsItem>,
    /// Non-empty article bodies joined by one space.
    pub text: String,
    pub articles_with_content: usize,
}

/// Fetch the news list and every article body.
#[instrument(level = "info", skip_all, fields(start_page = config.start_page, end_page = config.end_page))]
pub async fn collect_corpus<F: FetchText>(client: &F, config: &PipelineConfig) -> Corpus {
    let items = ltn::index_articles(client, config, config.start_page, config.end_page).await;
    let bodies = ltn::fetch_articles(client, &items).await;
    let non_empty: Vec<&str> = bodies
        .iter()
        .map(String::as_str)
        .filter(|b| !b.is_empty())
        .collect();
    info!(
        items = items.len(),
        with_content = non_empty.len(),
        "Collected corpus"
    );
    Corpus {
        text: non_empty.join(" "),
        articles_with_content: non_empty.len(),
        items,
    }
}

/// Segment and filter the corpus once, then derive both the display string
/// and the counts from that single token sequence.
#[instrument(level = "info", skip_all, fields(chars = corpus.chars().count()))]
pub fn analyze(tokenizer: &Tokenizer, corpus: &str) -> Analysis {
    let tokens = tokenizer.filtered_tokens(corpus);
    let analysis = Analysis {
        display: display_string(&tokens),
        ranking: frequency::count(&tokens),
    };
    info!(
        total = analysis.total_tokens(),
        distinct = analysis.ranking.len(),
        "Counted tokens"
    );
    analysis
}

/// Run the whole pipeline and write the artifacts named in `config`.
///
/// # Errors
///
/// Failing to write the frequency table, the optional news-list export, or
/// the image. The table is written before rendering, so it survives a render
/// failure.
#[instrument(level = "info", skip_all)]
pub async fn run<F: FetchText>(
    client: &F,
    config: &PipelineConfig,
    resources: &Resources,
) -> Result<RunSummary, Box<dyn Error>> {
    let corpus = collect_corpus(client, config).await;

    if let Some(path) = &config.news_list_output {
        json::write_news_list(&corpus.items, config.start_page, config.end_page, path).await?;
    }

    let analysis = analyze(&resources.tokenizer, &corpus.text);
    if analysis.ranking.is_empty() {
        warn!("No tokens survived filtering; the word cloud will fail");
    }

    let table = analysis.top(config.top_n);
    frequency_table::write_frequency_table(table, &config.frequency_output).await?;

    info!(path = %config.image_output.display(), "Generating word cloud");
    let words_drawn = resources
        .renderer
        .render(&analysis.display, &config.image_output)?;

    Ok(RunSummary {
        news_items: corpus.items.len(),
        articles_with_content: corpus.articles_with_content,
        total_tokens: analysis.total_tokens(),
        distinct_tokens: analysis.ranking.len(),
        table_entries: table.len(),
        words_drawn,
    })
}
