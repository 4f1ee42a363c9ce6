//! Output artifacts of a run.
//!
//! # Submodules
//!
//! - [`frequency_table`]: the `"{token}: {count}"` text table
//! - [`wordcloud`]: the word-cloud image
//! - [`json`]: optional JSON dump of the fetched news list
//!
//! # Output Layout
//!
//! ```text
//! word_frequency.txt     # top-N table, ranked
//! news_wordcloud.png     # 800x600, up to 200 words
//! news_list.json         # only with --news-list-output
//! ```

pub mod frequency_table;
pub mod json;
pub mod wordcloud;
