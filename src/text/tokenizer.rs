//! Chinese word segmentation and the token filter policy.
//!
//! Segmentation is jieba in accurate mode with HMM enabled for words missing
//! from the dictionary. The filter drops stopwords and anything whose trimmed
//! length is at most one character, keeping order and duplicates.

use crate::error::ResourceError;
use crate::text::stopwords::StopwordSet;
use itertools::Itertools;
use jieba_rs::Jieba;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Segmenter plus the stopwords it filters against.
pub struct Tokenizer {
    jieba: Jieba,
    stopwords: StopwordSet,
}

impl Tokenizer {
    /// Build a tokenizer over jieba's bundled dictionary.
    pub fn new(stopwords: StopwordSet) -> Self {
        Self {
            jieba: Jieba::new(),
            stopwords,
        }
    }

    /// Add entries from a jieba-format dictionary (`word [freq] [tag]`).
    #[instrument(level = "info", skip(self), fields(path = %path.display()))]
    pub fn load_user_dict(&mut self, path: &Path) -> Result<(), ResourceError> {
        let file = std::fs::File::open(path).map_err(|source| ResourceError::UserDictRead {
            path: path.display().to_string(),
            source,
        })?;
        self.jieba
            .load_dict(&mut BufReader::new(file))
            .map_err(|e| ResourceError::UserDict {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        info!("Loaded user dictionary");
        Ok(())
    }

    /// Segment `text` without filtering. Concatenating the result gives back
    /// the input.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.jieba.cut(text, true)
    }

    /// Segment and filter; the sequence both the counter and the renderer use.
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    pub fn filtered_tokens<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let raw = self.segment(text);
        let raw_count = raw.len();
        let kept = filter(raw, &self.stopwords);
        debug!(raw = raw_count, kept = kept.len(), "Filtered tokens");
        kept
    }
}

/// Keep tokens that are not stopwords and are longer than one character
/// once trimmed.
pub fn filter<I, S>(tokens: I, stopwords: &StopwordSet) -> Vec<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter(|t| keep_token(t.as_ref(), stopwords))
        .collect()
}

pub fn keep_token(token: &str, stopwords: &StopwordSet) -> bool {
    !stopwords.contains(token) && token.trim().chars().count() > 1
}

pub fn display_string<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens.iter().map(AsRef::as_ref).join(" ")
}
