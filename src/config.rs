//! Run configuration.
//!
//! A [`PipelineConfig`] is built once in `main` and then only borrowed. It is
//! layered: built-in defaults, then an optional YAML file, then CLI flags.
//!
//! ```yaml
//! start_page: 1
//! end_page: 5
//! delay_secs: 0.5
//! stopwords_path: ./stopwords.txt
//! font_path: ./NotoSansTC-Regular.ttf
//! top_n: null          # unbounded frequency table
//! render:
//!   width: 1200
//!   height: 900
//!   seed: 42
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::outputs::wordcloud::RenderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";
pub const DEFAULT_LISTING_BASE_URL: &str = "https://news.ltn.com.tw/ajax/breakingnews/";

/// Everything one run needs, resolved and validated.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub start_page: u32,
    pub end_page: u32,
    /// Sleep after every request that returned a response.
    pub delay_secs: f64,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub listing_base_url: String,
    pub category: String,
    pub stopwords_path: PathBuf,
    pub user_dict_path: Option<PathBuf>,
    pub font_path: PathBuf,
    pub frequency_output: PathBuf,
    pub image_output: PathBuf,
    pub news_list_output: Option<PathBuf>,
    /// `None` writes every counted word.
    pub top_n: Option<usize>,
    pub render: RenderOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            end_page: 3,
            delay_secs: 1.0,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            listing_base_url: DEFAULT_LISTING_BASE_URL.to_string(),
            category: "world".to_string(),
            stopwords_path: PathBuf::from("stopwords.txt"),
            user_dict_path: None,
            font_path: PathBuf::from("NotoSansTC-Regular.ttf"),
            frequency_output: PathBuf::from("word_frequency.txt"),
            image_output: PathBuf::from("news_wordcloud.png"),
            news_list_output: None,
            top_n: Some(25),
            render: RenderOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Build the run configuration from CLI flags, an optional YAML file and
    /// the defaults, in that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the YAML file cannot be read or parsed, or
    /// if the merged result fails [`PipelineConfig::validate`].
    #[instrument(level = "info", skip_all)]
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        info!(
            start_page = config.start_page,
            end_page = config.end_page,
            delay_secs = config.delay_secs,
            top_n = ?config.top_n,
            "Resolved configuration"
        );
        Ok(config)
    }

    /// Parse a YAML config file. Missing keys take their default value.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = cli.start_page {
            self.start_page = v;
        }
        if let Some(v) = cli.end_page {
            self.end_page = v;
        }
        if let Some(v) = cli.delay_secs {
            self.delay_secs = v;
        }
        if let Some(v) = cli.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = cli.connect_timeout_secs {
            self.connect_timeout_secs = v;
        }
        if let Some(v) = &cli.user_agent {
            self.user_agent = v.clone();
        }
        if let Some(v) = &cli.category {
            self.category = v.clone();
        }
        if let Some(v) = &cli.stopwords {
            self.stopwords_path = v.clone();
        }
        if let Some(v) = &cli.user_dict {
            self.user_dict_path = Some(v.clone());
        }
        if let Some(v) = &cli.font {
            self.font_path = v.clone();
        }
        if let Some(v) = &cli.frequency_output {
            self.frequency_output = v.clone();
        }
        if let Some(v) = &cli.image_output {
            self.image_output = v.clone();
        }
        if let Some(v) = &cli.news_list_output {
            self.news_list_output = Some(v.clone());
        }
        if cli.no_top_n {
            self.top_n = None;
        } else if let Some(v) = cli.top_n {
            self.top_n = Some(v);
        }
        if let Some(v) = cli.width {
            self.render.width = v;
        }
        if let Some(v) = cli.height {
            self.render.height = v;
        }
        if let Some(v) = cli.max_words {
            self.render.max_words = v;
        }
        if let Some(v) = cli.seed {
            self.render.seed = Some(v);
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_page == 0 {
            return Err(ConfigError::Invalid("start_page is 1-based, got 0".into()));
        }
        if self.start_page > self.end_page {
            return Err(ConfigError::Invalid(format!(
                "start_page {} is after end_page {}",
                self.start_page, self.end_page
            )));
        }
        if !self.delay_secs.is_finite() || self.delay_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "delay_secs must be a non-negative number, got {}",
                self.delay_secs
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        if self.category.trim().is_empty() || self.category.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "category must be a single path segment, got {:?}",
                self.category
            )));
        }
        self.listing_url(self.start_page)
            .map_err(|e| ConfigError::Invalid(format!("listing_base_url: {e}")))?;
        self.render.validate()?;
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// `{listing_base_url}/{category}/{page}`
    pub fn listing_url(&self, page: u32) -> Result<Url, url::ParseError> {
        let mut base = self.listing_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)?.join(&format!("{}/{}", self.category, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.start_page, 1);
        assert_eq!(config.end_page, 3);
        assert_eq!(config.delay(), Duration::from_secs(1));
        assert_eq!(config.top_n, Some(25));
        assert_eq!(config.render.width, 800);
        assert_eq!(config.render.height, 600);
        assert_eq!(config.render.max_words, 200);
    }

    #[test]
    fn test_listing_url() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.listing_url(2).unwrap().as_str(),
            "https://news.ltn.com.tw/ajax/breakingnews/world/2"
        );

        let config = PipelineConfig {
            listing_base_url: "https://news.ltn.com.tw/ajax/breakingnews".to_string(),
            category: "politics".to_string(),
            ..PipelineConfig::default()
        };
        assert_eq!(
            config.listing_url(7).unwrap().as_str(),
            "https://news.ltn.com.tw/ajax/breakingnews/politics/7"
        );
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let yaml = "end_page: 5\ndelay_secs: 0\ntop_n: null\nrender:\n  width: 1024\n  seed: 9\n";
        let config = PipelineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.start_page, 1);
        assert_eq!(config.end_page, 5);
        assert_eq!(config.delay(), Duration::ZERO);
        assert_eq!(config.top_n, None);
        assert_eq!(config.render.width, 1024);
        assert_eq!(config.render.height, 600);
        assert_eq!(config.render.seed, Some(9));
    }

    #[test]
    fn test_yaml_rejects_unknown_keys() {
        assert!(PipelineConfig::from_yaml_str("max_page: 3\n").is_err());
    }

    #[test]
    fn test_cli_overrides_yaml() {
        let path = std::env::temp_dir().join(format!(
            "ltn_wordcloud_config_{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, "end_page: 5\ntop_n: 10\nfont_path: yaml.ttf\n").unwrap();

        let cli = Cli::parse_from([
            "ltn_wordcloud",
            "--config",
            path.to_str().unwrap(),
            "--end-page",
            "8",
            "--no-top-n",
        ]);
        let config = PipelineConfig::resolve(&cli).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.end_page, 8);
        assert_eq!(config.top_n, None);
        assert_eq!(config.font_path, PathBuf::from("yaml.ttf"));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here.yaml")),
            ..Cli::default()
        };
        assert!(matches!(
            PipelineConfig::resolve(&cli),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let zero = PipelineConfig {
            start_page: 0,
            ..PipelineConfig::default()
        };
        assert!(zero.validate().is_err());

        let reversed = PipelineConfig {
            start_page: 4,
            end_page: 2,
            ..PipelineConfig::default()
        };
        assert!(reversed.validate().is_err());

        let single = PipelineConfig {
            start_page: 2,
            end_page: 2,
            ..PipelineConfig::default()
        };
        assert!(single.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_delay() {
        let config = PipelineConfig {
            delay_secs: -1.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            delay_secs: f64::NAN,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_canvas_flag_is_rejected() {
        let cli = Cli::parse_from(["ltn_wordcloud", "--width", "70000"]);
        assert!(matches!(
            PipelineConfig::resolve(&cli),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = PipelineConfig {
            listing_base_url: "not a url".to_string(),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
