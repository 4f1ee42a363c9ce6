use crate::error::ResourceError;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Words excluded from counting and from the cloud.
///
/// One entry per non-empty line of the source, trimmed. Loaded once and only
/// read afterwards.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// Load a UTF-8 stopword file.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Stopwords`] if the file is missing or not UTF-8.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ResourceError::Stopwords {
            path: path.display().to_string(),
            source,
        })?;
        let set = Self::from_lines(&raw);
        if set.is_empty() {
            warn!("Stopword list is empty; only the length filter applies");
        }
        info!(count = set.len(), "Loaded stopwords");
        Ok(set)
    }

    pub fn from_lines(raw: &str) -> Self {
        raw.lines().collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for StopwordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }
}
