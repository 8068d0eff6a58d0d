//! Sumi-Scout: a compliance-gated site auditor
//!
//! This crate decides whether a business website may be scraped for a given
//! jurisdiction, crawls a small bounded set of its pages politely (robots.txt,
//! per-host pacing), reports SEO defects and broken links, recovers contact
//! details for leads, and reduces everything into a weighted 0-100 score.

pub mod audit;
pub mod collaborators;
pub mod compliance;
pub mod config;
pub mod crawler;
pub mod leads;
pub mod output;
pub mod politeness;
pub mod robots;
pub mod scoring;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Scout operations
///
/// Only compliance rejection, rate limiting, robots denial and seed-page
/// failures end a run. Everything below the seed page is folded into the
/// report instead.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Request rejected by compliance gate: {}", .0.violated_rules.join("; "))]
    ComplianceRejected(compliance::ComplianceDecision),

    #[error("Rate limited for {host}, try again in {retry_after_secs} seconds")]
    RateLimited {
        host: String,
        wait_ms: u64,
        retry_after_secs: u64,
    },

    #[error("URL disallowed by robots.txt: {url}")]
    RobotsDenied { url: String },

    #[error("Seed page {url} could not be fetched: {source}")]
    SeedFetch { url: String, source: FetchError },

    #[error("Invalid analysis target: {0}")]
    InvalidTarget(String),

    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScoutError {
    /// Builds a rate-limit error from the wait reported by the politeness controller
    pub fn rate_limited(host: &str, wait: std::time::Duration) -> Self {
        let wait_ms = wait.as_millis() as u64;
        Self::RateLimited {
            host: host.to_string(),
            wait_ms,
            retry_after_secs: wait_ms.div_ceil(1000).max(1),
        }
    }
}

/// Failure of a single page fetch
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("HTTP {status} for {url}")]
    HttpError { url: String, status: u16 },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("Expected HTML from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },
}

impl FetchError {
    /// Returns the HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use compliance::{ComplianceDecision, ComplianceGate, RequestKind, ScrapeRequest};
pub use config::Config;
pub use crawler::{Orchestrator, OrchestratorBuilder};
pub use scoring::SiteScoreReport;
pub use crate::url::{extract_domain, parse_target_url};
