//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during an analysis:
//! - Building the HTTP client with the declared user agent and redirect limit
//! - GET requests for pages, with a per-request timeout
//! - Lightweight existence checks (HEAD, falling back to GET) for outbound links
//! - Error classification

use crate::config::UserAgentConfig;
use crate::FetchError;
use reqwest::{redirect::Policy, Client, Method};
use std::error::Error as _;
use std::time::{Duration, Instant};
use url::Url;

/// A page retrieved over HTTP
///
/// Consumed by the analyzer and lead extractor, then dropped.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: Url,
    /// HTTP status code of the final response
    pub status_code: u16,
    /// Response body
    pub body: String,
    /// URL after redirects
    pub final_url: Url,
    /// Time from sending the request to having the full body
    pub elapsed: Duration,
}

impl FetchedPage {
    /// Size of the body in bytes
    pub fn size_bytes(&self) -> usize {
        self.body.len()
    }
}

/// Outcome of checking that an outbound link exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// The server answered below 400
    Reachable(u16),
    /// The link is broken: an HTTP error status or a failure to connect at all
    Broken {
        status: Option<u16>,
        reason: Option<String>,
    },
    /// The check itself failed (e.g. timeout); nothing can be said about the link
    Inconclusive(String),
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `max_redirects` - Redirects followed before a request fails
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_scout::config::UserAgentConfig;
/// use sumi_scout::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SumiScout".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, 5).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    max_redirects: usize,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page with a per-request timeout
///
/// Redirects are followed up to the client's limit. Any final status of 400 or
/// above is an `HttpError`; a non-HTML `Content-Type` is `NotHtml`.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Timeout covering the whole request
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<FetchedPage, FetchError> {
    let started = Instant::now();

    let response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, &e))?;

    let status = response.status();
    let final_url = response.url().clone();

    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::HttpError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if !content_type.is_empty() && !content_type.contains("html") {
        return Err(FetchError::NotHtml {
            url: url.to_string(),
            content_type,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_error(url, &e))?;

    Ok(FetchedPage {
        url: url.clone(),
        status_code: status.as_u16(),
        body,
        final_url,
        elapsed: started.elapsed(),
    })
}

/// Checks whether a link target exists
///
/// Sends HEAD first. Servers that refuse HEAD (405/501) get a GET instead.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The link target
/// * `timeout` - Timeout for each request
pub async fn check_link(client: &Client, url: &Url, timeout: Duration) -> LinkStatus {
    match probe(client, Method::HEAD, url, timeout).await {
        LinkStatus::Broken {
            status: Some(405 | 501),
            ..
        } => probe(client, Method::GET, url, timeout).await,
        status => status,
    }
}

async fn probe(client: &Client, method: Method, url: &Url, timeout: Duration) -> LinkStatus {
    match client
        .request(method, url.clone())
        .timeout(timeout)
        .send()
        .await
    {
        Ok(response) if response.status().as_u16() >= 400 => LinkStatus::Broken {
            status: Some(response.status().as_u16()),
            reason: response
                .status()
                .canonical_reason()
                .map(|r| r.to_string()),
        },
        Ok(response) => LinkStatus::Reachable(response.status().as_u16()),
        Err(e) if e.is_timeout() => LinkStatus::Inconclusive("Request timeout".to_string()),
        Err(e) => match classify_error(url, &e) {
            FetchError::ConnectionFailed { reason, .. } if e.is_connect() => LinkStatus::Broken {
                status: None,
                reason: Some(reason),
            },
            FetchError::RedirectLimit { .. } => LinkStatus::Broken {
                status: None,
                reason: Some("Too many redirects".to_string()),
            },
            other => LinkStatus::Inconclusive(other.to_string()),
        },
    }
}

/// Returns true if `url` answers a HEAD/GET with a 2xx status
pub async fn resource_exists(client: &Client, url: &Url, timeout: Duration) -> bool {
    matches!(
        check_link(client, url, timeout).await,
        LinkStatus::Reachable(code) if (200..300).contains(&code)
    )
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &Url, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_redirect() {
        FetchError::RedirectLimit {
            url: url.to_string(),
        }
    } else {
        FetchError::ConnectionFailed {
            url: url.to_string(),
            reason: root_cause(error),
        }
    }
}

/// Innermost message of an error chain ("dns error: ...", "Connection refused")
fn root_cause(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message = inner.to_string();
        source = inner.source();
    }
    message
}
