//! Outbound HTTP behind a small trait.
//!
//! The fetchers only ever need "GET this URL, give me the body as text", so
//! that is the whole seam:
//! - [`FetchText`]: core trait for a text GET
//! - [`HttpClient`]: reqwest implementation carrying User-Agent and timeouts
//! - [`Throttled`]: decorator that sleeps a fixed delay after every request
//!   the server answered
//!
//! Anything other than `200 OK` is a [`FetchError::Status`]. There is no retry.

use crate::config::PipelineConfig;
use crate::error::FetchError;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Fetch a URL and return its body as text.
pub trait FetchText {
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed [`FetchText`], built once per run from the config.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client that sends `config.user_agent` and enforces both the
    /// total and the connect timeout on every request.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl FetchText for HttpClient {
    #[instrument(level = "debug", skip(self))]
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Non-200 response");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched"
        );
        Ok(body)
    }
}

/// Wrapper that sleeps `delay` after each request that got an HTTP response,
/// successful or not. Transport failures return immediately.
///
/// The wrapper only sees the transport result. A `200 OK` whose body later
/// fails to parse (a malformed listing page) has already been throttled.
pub struct Throttled<T> {
    inner: T,
    delay: Duration,
}

impl<T> Throttled<T>
where
    T: FetchText,
{
    pub fn new(inner: T, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl<T> fmt::Debug for Throttled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("delay", &self.delay)
            .finish()
    }
}

impl<T> FetchText for Throttled<T>
where
    T: FetchText,
{
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let res = self.inner.get_text(url).await;
        let answered = matches!(res, Ok(_) | Err(FetchError::Status { .. }));
        if answered && !self.delay.is_zero() {
            debug!(delay_ms = self.delay.as_millis() as u64, "Throttling");
            sleep(self.delay).await;
        }
        res
    }
}

#[cfg(test)]
pub mod fake {
    //! In-memory [`FetchText`] that records every URL it is asked for.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct FakeFetcher {
        responses: HashMap<String, Result<String, u16>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `url` with `200 OK` and `body`.
        pub fn ok(mut self, url: &str, body: &str) -> Self {
            self.responses.insert(url.to_string(), Ok(body.to_string()));
            self
        }

        /// Answer `url` with a non-200 `status`.
        pub fn status(mut self, url: &str, status: u16) -> Self {
            self.responses.insert(url.to_string(), Err(status));
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl FetchText for FakeFetcher {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }
}
