//! Sitemap fetch capability
//!
//! The walker only ever sees the [`FetchContent`] trait: a URL goes in, raw
//! bytes come out. [`HttpFetcher`] is the production implementation; plain
//! closures also implement the trait so callers can substitute cached or
//! canned content.

use crate::config::FetcherConfig;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;

/// Retrieves the raw bytes of a sitemap document
///
/// Implementations are expected to enforce their own timeout and report any
/// failure (network, timeout, non-success status) as a [`FetchError`].
#[allow(async_fn_in_trait)]
pub trait FetchContent {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F> FetchContent for F
where
    F: Fn(&str) -> Result<Vec<u8>, FetchError>,
{
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self(url)
    }
}

/// Builds an HTTP client for sitemap retrieval
///
/// # Arguments
///
/// * `config` - The fetcher configuration (client identifier and timeout)
///
/// # Example
///
/// ```no_run
/// use docs_discovery::config::FetcherConfig;
/// use docs_discovery::discovery::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches sitemap documents over HTTP(S) with a GET request
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let client = build_http_client(config).map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl FetchContent for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify_error(url, e))?;
        Ok(body.to_vec())
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
