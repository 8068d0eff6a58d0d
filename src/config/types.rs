use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub compliance: ComplianceConfig,
    #[serde(default, rename = "jurisdiction")]
    pub jurisdictions: Vec<JurisdictionEntry>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration with default limits for the given identity
    pub fn new(user_agent: UserAgentConfig) -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent,
            compliance: ComplianceConfig::default(),
            jurisdictions: Vec::new(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages analyzed per site, seed included
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum number of page analyses running at once
    #[serde(rename = "max-concurrent-pages", default = "default_max_concurrent_pages")]
    pub max_concurrent_pages: usize,

    /// Minimum time between requests to the same host (milliseconds)
    #[serde(rename = "minimum-interval", default = "default_minimum_interval")]
    pub minimum_interval: u64,

    /// Timeout for a single page fetch (milliseconds)
    #[serde(rename = "page-timeout", default = "default_page_timeout")]
    pub page_timeout: u64,

    /// Timeout for the robots.txt fetch (milliseconds)
    #[serde(rename = "robots-timeout", default = "default_short_timeout")]
    pub robots_timeout: u64,

    /// Timeout for a single outbound link check (milliseconds)
    #[serde(rename = "link-check-timeout", default = "default_short_timeout")]
    pub link_check_timeout: u64,

    /// Maximum number of outbound links verified per page
    #[serde(rename = "max-link-checks", default = "default_max_link_checks")]
    pub max_link_checks: usize,

    /// Maximum redirects followed by any request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl CrawlerConfig {
    pub fn minimum_interval(&self) -> Duration {
        Duration::from_millis(self.minimum_interval)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout)
    }

    pub fn robots_timeout(&self) -> Duration {
        Duration::from_millis(self.robots_timeout)
    }

    pub fn link_check_timeout(&self) -> Duration {
        Duration::from_millis(self.link_check_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_concurrent_pages: default_max_concurrent_pages(),
            minimum_interval: default_minimum_interval(),
            page_timeout: default_page_timeout(),
            robots_timeout: default_short_timeout(),
            link_check_timeout: default_short_timeout(),
            max_link_checks: default_max_link_checks(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the token matched against robots.txt groups
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Full User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Request limits enforced by the compliance gate
#[derive(Debug, Clone, Deserialize)]
pub struct ComplianceConfig {
    /// Largest search radius accepted for location requests (miles)
    #[serde(rename = "max-radius", default = "default_max_radius")]
    pub max_radius: u32,

    /// Largest number of results a single request may ask for
    #[serde(
        rename = "max-results-per-request",
        default = "default_max_results_per_request"
    )]
    pub max_results_per_request: u32,

    /// How many places candidates get a full site analysis per area request
    #[serde(rename = "max-candidate-sites", default = "default_max_candidate_sites")]
    pub max_candidate_sites: usize,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            max_radius: default_max_radius(),
            max_results_per_request: default_max_results_per_request(),
            max_candidate_sites: default_max_candidate_sites(),
        }
    }
}

/// A jurisdiction rule set supplied in the config file
///
/// Entries override the built-in rule with the same code, or add new codes.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionEntry {
    /// Jurisdiction code (e.g., "CA"), or "DEFAULT" to replace the fallback
    pub code: String,

    #[serde(rename = "requires-consent", default)]
    pub requires_consent: bool,

    #[serde(rename = "max-requests-per-day")]
    pub max_requests_per_day: u32,

    #[serde(rename = "allowed-data-fields")]
    pub allowed_data_fields: Vec<String>,

    #[serde(rename = "restriction-notes", default)]
    pub restriction_notes: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to the markdown report file
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

fn default_max_pages() -> usize {
    10
}

fn default_max_concurrent_pages() -> usize {
    5
}

fn default_minimum_interval() -> u64 {
    1000
}

fn default_page_timeout() -> u64 {
    10_000
}

fn default_short_timeout() -> u64 {
    5_000
}

fn default_max_link_checks() -> usize {
    20
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_radius() -> u32 {
    25
}

fn default_max_results_per_request() -> u32 {
    50
}

fn default_max_candidate_sites() -> usize {
    10
}
