//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building an HTTP client with browser-like default headers
//! - GET requests with an optional Referer
//! - Error classification (non-2xx status vs transport failure)
//!
//! A failed fetch is final: there is no retry at this layer.

use crate::config::HttpConfig;
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER};
use reqwest::Client;
use std::time::Duration;

/// Capability to GET a page as text
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Fetches `url`, sending `referer` when given
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Response body on a 2xx status
    /// * `Err(FetchError)` - Non-2xx status or transport failure
    async fn get(&self, url: &str, referer: Option<&str>) -> FetchResult<String>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration (user agent, accept header, timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use catalog_crawler::config::HttpConfig;
/// use catalog_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&config.accept) {
        Ok(accept) => {
            headers.insert(ACCEPT, accept);
        }
        Err(e) => tracing::warn!("Ignoring invalid accept header '{}': {}", config.accept, e),
    }

    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Production fetcher backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Creates a fetcher from HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str, referer: Option<&str>) -> FetchResult<String> {
        let mut request = self.client.get(url);
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        tracing::trace!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}
