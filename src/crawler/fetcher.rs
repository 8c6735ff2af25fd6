//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent string
//! - GET requests with an optional per-request timeout
//! - Error classification (HTTP status, timeout, transport)

use crate::url::SiteUrl;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Capability to retrieve the raw content of a page
///
/// Implementations must be shareable across worker tasks.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, giving up after `timeout` when one is set
    async fn fetch(&self, url: &SiteUrl, timeout: Option<Duration>) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with the given user agent
///
/// # Example
///
/// ```no_run
/// use site_mapper::crawler::build_http_client;
///
/// let client = build_http_client("CrawlerBot/0.1").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(user_agent).gzip(true).brotli(true).build()
}

/// [`Fetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Sends a GET request and returns the response body
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP status >= 400 | `FetchError::Status` |
    /// | Timeout elapsed | `FetchError::Timeout` |
    /// | Connection, TLS or body error | `FetchError::Transport` |
    async fn fetch(&self, url: &SiteUrl, timeout: Option<Duration>) -> Result<Vec<u8>, FetchError> {
        let target = url.to_string();

        let mut request = self.client.get(&target);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_error(&target, e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                url: target,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(&target, e))?;

        Ok(body.to_vec())
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Transport {
            url: url.to_string(),
            message: format!("connection failed: {}", error),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
