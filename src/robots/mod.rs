//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! Every failure to obtain the file is treated as permission to crawl.

mod cache;
mod parser;

pub use cache::CachedRobots;
pub use parser::ParsedRobots;

use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Fetches robots.txt from the origin of `site_url`
///
/// # Arguments
///
/// * `client` - The HTTP client (carries our User-Agent)
/// * `site_url` - Any URL on the site; only its origin is used
/// * `timeout` - Timeout for this single request
///
/// # Returns
///
/// The parsed file and whether the host served one with HTTP 200. A missing
/// file, an HTTP error, a timeout or a network error all yield an allow-all
/// result.
pub async fn fetch_robots(client: &Client, site_url: &Url, timeout: Duration) -> CachedRobots {
    let robots_url = match site_url.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", site_url, e);
            return CachedRobots::new(ParsedRobots::allow_all(), false);
        }
    };

    let response = match client.get(robots_url.clone()).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("robots.txt fetch failed for {}: {}", robots_url, e);
            return CachedRobots::new(ParsedRobots::allow_all(), false);
        }
    };

    if response.status() != StatusCode::OK {
        tracing::debug!(
            "robots.txt at {} returned {}, allowing all",
            robots_url,
            response.status()
        );
        return CachedRobots::new(ParsedRobots::allow_all(), false);
    }

    match response.text().await {
        Ok(body) => CachedRobots::new(ParsedRobots::from_content(&body), true),
        Err(e) => {
            tracing::debug!("robots.txt body unreadable at {}: {}", robots_url, e);
            CachedRobots::new(ParsedRobots::allow_all(), true)
        }
    }
}
