//! Command-line interface definitions for ltn_wordcloud.
//!
//! Every flag is optional. Unset flags fall back to the YAML config file (if
//! `--config` is given) and then to the built-in defaults, see
//! [`crate::config::PipelineConfig::resolve`].

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for a single pipeline run.
///
/// # Examples
///
/// ```sh
/// # Defaults: pages 1..=3, stopwords.txt, NotoSansTC-Regular.ttf
/// ltn_wordcloud
///
/// # Five pages, no delay, custom outputs
/// ltn_wordcloud --end-page 5 --delay-secs 0 -f freq.txt -o cloud.png
///
/// # Everything from a YAML file, with one override
/// ltn_wordcloud --config run.yaml --top-n 50
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "LTN_WORDCLOUD_CONFIG")]
    pub config: Option<PathBuf>,

    /// First listing page to fetch (1-based)
    #[arg(long)]
    pub start_page: Option<u32>,

    /// Last listing page to fetch (inclusive)
    #[arg(long)]
    pub end_page: Option<u32>,

    /// Seconds to sleep after each request that got a response
    #[arg(long)]
    pub delay_secs: Option<f64>,

    /// Total timeout per request, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Connect timeout per request, in seconds
    #[arg(long)]
    pub connect_timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Breaking-news category segment of the listing URL
    #[arg(long)]
    pub category: Option<String>,

    /// Stopword list, one word per line
    #[arg(short, long)]
    pub stopwords: Option<PathBuf>,

    /// Extra jieba dictionary loaded on top of the default one
    #[arg(long)]
    pub user_dict: Option<PathBuf>,

    /// Font file used for the word cloud (must cover CJK glyphs)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Where to write the frequency table
    #[arg(short, long)]
    pub frequency_output: Option<PathBuf>,

    /// Where to write the word-cloud image
    #[arg(short = 'o', long)]
    pub image_output: Option<PathBuf>,

    /// Also dump the fetched news list as JSON to this path
    #[arg(long)]
    pub news_list_output: Option<PathBuf>,

    /// Number of entries kept in the frequency table
    #[arg(short = 'n', long, conflicts_with = "no_top_n")]
    pub top_n: Option<usize>,

    /// Write every counted word to the frequency table
    #[arg(long)]
    pub no_top_n: bool,

    /// Word-cloud canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Word-cloud canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Maximum number of distinct words drawn
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Seed for the word-cloud layout RNG (random when unset)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_defaults_to_none() {
        let cli = Cli::parse_from(["ltn_wordcloud"]);

        assert!(cli.config.is_none());
        assert!(cli.start_page.is_none());
        assert!(cli.top_n.is_none());
        assert!(!cli.no_top_n);
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "ltn_wordcloud",
            "--start-page",
            "2",
            "--end-page",
            "4",
            "--delay-secs",
            "0.5",
            "--font",
            "/fonts/cjk.ttf",
            "--seed",
            "7",
        ]);

        assert_eq!(cli.start_page, Some(2));
        assert_eq!(cli.end_page, Some(4));
        assert_eq!(cli.delay_secs, Some(0.5));
        assert_eq!(cli.font, Some(PathBuf::from("/fonts/cjk.ttf")));
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "ltn_wordcloud",
            "-s",
            "stop.txt",
            "-f",
            "/tmp/freq.txt",
            "-o",
            "/tmp/cloud.png",
            "-n",
            "10",
        ]);

        assert_eq!(cli.stopwords, Some(PathBuf::from("stop.txt")));
        assert_eq!(cli.frequency_output, Some(PathBuf::from("/tmp/freq.txt")));
        assert_eq!(cli.image_output, Some(PathBuf::from("/tmp/cloud.png")));
        assert_eq!(cli.top_n, Some(10));
    }

    #[test]
    fn test_top_n_conflicts_with_no_top_n() {
        let res = Cli::try_parse_from(["ltn_wordcloud", "--top-n", "5", "--no-top-n"]);
        assert!(res.is_err());
    }
}
