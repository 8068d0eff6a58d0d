//! Page analyzer
//!
//! Evaluates one fetched page: metadata, heading structure, images, content
//! volume, mobile viewport, and the reachability of its links. Produces typed,
//! severity-ranked issues plus broken-link records.

mod checks;
mod issue;
mod links;

pub use checks::{run_checks, Finding, PageMetrics};
pub use issue::{BrokenLinkRecord, IssueCategory, PageIssue, Severity};
pub use links::{select_links, verify_links, OutboundLink};

use crate::config::CrawlerConfig;
use crate::crawler::{FetchedPage, PageDocument};
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Limits applied while analyzing a page
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerOptions {
    pub max_link_checks: usize,
    pub link_timeout: Duration,
}

impl AnalyzerOptions {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_link_checks: config.max_link_checks,
            link_timeout: config.link_check_timeout(),
        }
    }
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Everything learned from a page without touching the network
#[derive(Debug, Clone)]
pub struct PageInspection {
    pub url: Url,
    pub title: Option<String>,
    pub metrics: PageMetrics,
    pub issues: Vec<PageIssue>,
    pub links: Vec<OutboundLink>,
}

/// Result of analyzing one page
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub url: Url,
    pub title: Option<String>,
    /// None when the page could not be loaded
    pub metrics: Option<PageMetrics>,
    pub issues: Vec<PageIssue>,
    pub broken_links: Vec<BrokenLinkRecord>,
}

/// Runs the document checks and picks links to verify
///
/// Synchronous so that the non-`Send` document never crosses an `.await`.
pub fn inspect(
    doc: &PageDocument,
    page: &FetchedPage,
    options: &AnalyzerOptions,
) -> PageInspection {
    let metrics = PageMetrics::from_document(doc);
    let title = metrics.title.clone();
    let page_url = page.final_url.to_string();

    let issues = run_checks(&metrics)
        .into_iter()
        .map(|finding| PageIssue {
            page_url: page_url.clone(),
            page_title: title.clone(),
            category: finding.category,
            severity: finding.severity,
            description: finding.description,
            recommendation: finding.recommendation,
        })
        .collect();

    PageInspection {
        url: page.final_url.clone(),
        title,
        links: select_links(&doc.anchors(), &page.final_url, options.max_link_checks),
        metrics,
        issues,
    }
}

/// Verifies the links picked by `inspect` and completes the analysis
pub async fn finish(
    client: &Client,
    inspection: PageInspection,
    options: &AnalyzerOptions,
) -> PageAnalysis {
    let broken_links = verify_links(
        client,
        &inspection.url,
        inspection.title.as_deref(),
        inspection.links,
        options.link_timeout,
    )
    .await;

    PageAnalysis {
        url: inspection.url,
        title: inspection.title,
        metrics: Some(inspection.metrics),
        issues: inspection.issues,
        broken_links,
    }
}

/// Analyzes one fetched page
///
/// # Arguments
///
/// * `client` - HTTP client used for link checks
/// * `page` - The fetched page
/// * `options` - Link-check limits
///
/// # Returns
///
/// The page's issues in check order and its broken links in link order
pub async fn analyze(
    client: &Client,
    page: &FetchedPage,
    options: &AnalyzerOptions,
) -> PageAnalysis {
    let inspection = {
        let doc = PageDocument::parse(&page.body);
        inspect(&doc, page, options)
    };
    finish(client, inspection, options).await
}

/// The analysis of a non-seed page that could not be fetched
///
/// The failure degrades to a single high-severity issue.
pub fn page_failure(url: &Url, error: &FetchError) -> PageAnalysis {
    tracing::warn!("Page {} could not be analyzed: {}", url, error);

    PageAnalysis {
        url: url.clone(),
        title: None,
        metrics: None,
        issues: vec![PageIssue {
            page_url: url.to_string(),
            page_title: None,
            category: IssueCategory::Availability,
            severity: Severity::High,
            description: "Page could not be loaded".to_string(),
            recommendation: "Check if page exists and is accessible".to_string(),
        }],
        broken_links: Vec::new(),
    }
}
