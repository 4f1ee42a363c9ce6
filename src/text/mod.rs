//! Text processing: stopwords, segmentation and counting.
//!
//! - [`stopwords`]: the [`StopwordSet`] loaded at startup
//! - [`tokenizer`]: jieba segmentation plus the shared filter policy
//! - [`frequency`]: [`TokenCounter`] and its tie-stable ranking

pub mod frequency;
pub mod stopwords;
pub mod tokenizer;

pub use frequency::TokenCounter;
pub use stopwords::StopwordSet;
pub use tokenizer::Tokenizer;
