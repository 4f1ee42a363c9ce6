//! Error types for each failure domain of the pipeline.
//!
//! Fetch errors are transient: the fetchers log them and move on. Config and
//! render errors are fatal and bubble up to `main` as `Box<dyn Error>`.

use thiserror::Error;

/// Failure of a single outbound request (one listing page or one article).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, TLS, timeout, body read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with anything other than `200 OK`.
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// The listing body was not the JSON envelope we expect.
    #[error("malformed listing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Failure while laying out or persisting the word cloud.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("need at least one word to draw a word cloud, got none")]
    EmptyText,

    #[error("no room on a {width}x{height} canvas for the first word")]
    NoSpace { width: u32, height: u32 },

    #[error("failed to read font file {path}: {source}")]
    FontRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("font file {path} is not a usable TrueType/OpenType font")]
    InvalidFont { path: String },

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Invalid or unreadable configuration. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A required input resource could not be loaded. Always fatal.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read stopword list {path}: {source}")]
    Stopwords {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read user dictionary {path}: {source}")]
    UserDictRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid user dictionary {path}: {reason}")]
    UserDict { path: String, reason: String },
}
