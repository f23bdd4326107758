//! HTTP fetcher implementation
//!
//! Every target is fetched with a single GET whose body is read right away.
//! Classification of the status (200, 404, anything else) is left to the
//! caller because a 404 means different things for pages and resources.

use crate::config::HttpConfig;
use crate::url::{is_html, suffix_for};
use crate::{DocsetError, Result};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use std::borrow::Cow;
use std::time::Duration;
use url::Url;

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL that was requested, before redirects
    pub url: Url,
    pub status: u16,
    /// Content-Type header value, empty when absent
    pub content_type: String,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND.as_u16()
    }

    /// Returns true if the response is served as `text/html`
    pub fn is_html(&self) -> bool {
        is_html(&self.content_type)
    }

    /// Suffix the saved file needs, inferred from the content type
    pub fn suffix(&self) -> &'static str {
        suffix_for(&self.content_type, self.url.path())
    }

    /// Decodes the body as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use docset_ripple::config::HttpConfig;
/// use docset_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and reads its body
///
/// Redirects are followed by the client. Any status is returned as a
/// response; only transport failures (connect, timeout, body read) are
/// errors.
///
/// # Returns
///
/// * `Ok(FetchResponse)` - The server answered and the body was read
/// * `Err(DocsetError::Http)` - The request or the body read failed
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchResponse> {
    let http_error = |source| DocsetError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url.clone()).send().await.map_err(http_error)?;

    let status = response.status().as_u16();
    if response.url() != url {
        tracing::debug!("{} redirected to {}", url, response.url());
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response.bytes().await.map_err(http_error)?.to_vec();

    tracing::trace!(
        "GET {} -> {} ({}, {} bytes)",
        url,
        status,
        content_type,
        body.len()
    );

    Ok(FetchResponse {
        url: url.clone(),
        status,
        content_type,
        body,
    })
}
