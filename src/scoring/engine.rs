//! Point tables and the score reduction
//!
//! Each category awards fixed points per sub-check. Category maxima add up
//! to the weights: technical 30, content 25, performance 25, accessibility 20.

use crate::audit::{BrokenLinkRecord, PageIssue, Severity};
use crate::scoring::report::{CategoryScores, Recommendation, SiteScoreReport};
use crate::scoring::signals::{
    AccessibilitySignals, ContentSignals, PerformanceSignals, SiteSignals, TechnicalSignals,
};
use chrono::Utc;
use std::time::Duration;

const SSL_POINTS: f64 = 6.0;
const SITEMAP_POINTS: f64 = 6.0;
const ROBOTS_POINTS: f64 = 4.0;
const STRUCTURED_DATA_POINTS: f64 = 6.0;
const MOBILE_POINTS: f64 = 4.0;
const EXTERNAL_PERFORMANCE_POINTS: f64 = 4.0;

const CONTENT_CHECK_POINTS: f64 = 5.0;
const CONTENT_CHECKS: f64 = 5.0;

const FAST_LOAD: Duration = Duration::from_secs(2);
const ACCEPTABLE_LOAD: Duration = Duration::from_secs(3);
const FAST_LOAD_POINTS: f64 = 15.0;
const ACCEPTABLE_LOAD_POINTS: f64 = 10.0;
const MAX_PAGE_BYTES: usize = 1024 * 1024;
const PAGE_SIZE_POINTS: f64 = 10.0;

const ALT_TEXT_POINTS: f64 = 8.0;
const LABEL_POINTS: f64 = 6.0;
const LANG_POINTS: f64 = 6.0;

/// Points achieved out of points possible within one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Points {
    pub achieved: f64,
    pub possible: f64,
}

impl Points {
    /// `round(100 * achieved / possible)` clamped to 0-100; 0 when nothing was possible
    pub fn percent(&self) -> u8 {
        percent(self.achieved, self.possible)
    }
}

fn percent(achieved: f64, possible: f64) -> u8 {
    if possible <= 0.0 || !achieved.is_finite() {
        return 0;
    }
    (100.0 * achieved / possible).round().clamp(0.0, 100.0) as u8
}

fn award(condition: bool, points: f64) -> f64 {
    if condition {
        points
    } else {
        0.0
    }
}

pub fn technical_points(signals: &TechnicalSignals) -> Points {
    let mut achieved = award(signals.has_ssl, SSL_POINTS)
        + award(signals.has_sitemap, SITEMAP_POINTS)
        + award(signals.has_robots_txt, ROBOTS_POINTS)
        + award(signals.has_structured_data, STRUCTURED_DATA_POINTS)
        + award(signals.mobile_friendly, MOBILE_POINTS);
    let mut possible =
        SSL_POINTS + SITEMAP_POINTS + ROBOTS_POINTS + STRUCTURED_DATA_POINTS + MOBILE_POINTS;

    // Without an external score its share drops out of both sides
    if let Some(score) = signals.performance_score {
        let score = if score.is_nan() { 0.0 } else { score };
        achieved += (score / 25.0).clamp(0.0, EXTERNAL_PERFORMANCE_POINTS);
        possible += EXTERNAL_PERFORMANCE_POINTS;
    }

    Points { achieved, possible }
}

pub fn content_points(signals: &ContentSignals) -> Points {
    let checks = [
        signals.h1_count == 1,
        (30..=60).contains(&signals.title_length),
        signals
            .meta_description_length
            .is_some_and(|len| (120..=160).contains(&len)),
        signals.word_count >= 300,
        signals.distinct_heading_levels >= 3,
    ];

    Points {
        achieved: checks
            .iter()
            .map(|&passed| award(passed, CONTENT_CHECK_POINTS))
            .sum(),
        possible: CONTENT_CHECKS * CONTENT_CHECK_POINTS,
    }
}

pub fn performance_points(signals: &PerformanceSignals) -> Points {
    let load = if signals.load_time < FAST_LOAD {
        FAST_LOAD_POINTS
    } else if signals.load_time < ACCEPTABLE_LOAD {
        ACCEPTABLE_LOAD_POINTS
    } else {
        0.0
    };

    Points {
        achieved: load + award(signals.page_size_bytes < MAX_PAGE_BYTES, PAGE_SIZE_POINTS),
        possible: FAST_LOAD_POINTS + PAGE_SIZE_POINTS,
    }
}

pub fn accessibility_points(signals: &AccessibilitySignals) -> Points {
    let alt = match signals.images_missing_alt {
        0 => ALT_TEXT_POINTS,
        1..=2 => ALT_TEXT_POINTS / 2.0,
        _ => 0.0,
    };
    let labels = match signals.unlabeled_controls {
        0 => LABEL_POINTS,
        1 => LABEL_POINTS / 2.0,
        _ => 0.0,
    };

    Points {
        achieved: alt + labels + award(signals.has_lang, LANG_POINTS),
        possible: ALT_TEXT_POINTS + LABEL_POINTS + LANG_POINTS,
    }
}

/// Builds the prioritized recommendation list
///
/// High-severity page issues come first in encounter order, then the
/// score-derived suggestions; the sort is stable so equal priorities keep
/// their relative order.
pub fn recommendations(
    signals: &SiteSignals,
    issues: &[PageIssue],
    broken_links: &[BrokenLinkRecord],
) -> Vec<Recommendation> {
    let technical = &signals.technical;
    let mut items: Vec<Recommendation> = issues
        .iter()
        .filter(|issue| issue.severity == Severity::High)
        .map(|issue| Recommendation::new(Severity::High, issue.as_recommendation()))
        .collect();

    if !technical.has_ssl {
        items.push(Recommendation::new(
            Severity::High,
            "Enable SSL certificate (HTTPS) for better security and SEO",
        ));
    }
    if !technical.mobile_friendly {
        items.push(Recommendation::new(
            Severity::High,
            "Optimize for mobile devices with responsive design",
        ));
    }
    if !technical.has_sitemap {
        items.push(Recommendation::new(
            Severity::Medium,
            "Create and submit an XML sitemap to help search engines crawl your site",
        ));
    }
    if !technical.has_structured_data {
        items.push(Recommendation::new(
            Severity::Medium,
            "Implement structured data (Schema.org markup) for rich snippets",
        ));
    }
    if !broken_links.is_empty() {
        items.push(Recommendation::new(
            Severity::Medium,
            format!("Fix {} broken links to improve SEO", broken_links.len()),
        ));
    }
    if !technical.has_robots_txt {
        items.push(Recommendation::new(
            Severity::Low,
            "Add a robots.txt file to control search engine crawling",
        ));
    }

    items.sort_by_key(|r| r.priority);
    items
}

/// Reduces all signals into a report
///
/// # Arguments
///
/// * `url` - The analyzed site
/// * `signals` - Category signals
/// * `issues` - Page issues from every analyzed page
/// * `broken_links` - Broken links from every analyzed page
///
/// # Returns
///
/// A report with category scores, the overall score and prioritized
/// recommendations. Leads, advisories and insights are left empty for the
/// caller to attach.
pub fn score(
    url: &str,
    signals: &SiteSignals,
    issues: Vec<PageIssue>,
    broken_links: Vec<BrokenLinkRecord>,
) -> SiteScoreReport {
    let categories = [
        technical_points(&signals.technical),
        content_points(&signals.content),
        performance_points(&signals.performance),
        accessibility_points(&signals.accessibility),
    ];
    let achieved: f64 = categories.iter().map(|p| p.achieved).sum();
    let possible: f64 = categories.iter().map(|p| p.possible).sum();
    let overall_score = percent(achieved, possible);

    if signals.technical.performance_score.is_none() {
        tracing::info!(
            "Scoring {} without external performance data ({} of {} points possible)",
            url,
            possible,
            possible + EXTERNAL_PERFORMANCE_POINTS
        );
    }

    let [technical, content, performance, accessibility] = categories;
    let recommendations = recommendations(signals, &issues, &broken_links)
        .into_iter()
        .map(|r| r.text)
        .collect();

    SiteScoreReport {
        url: url.to_string(),
        overall_score,
        category_scores: CategoryScores {
            technical: technical.percent(),
            content: content.percent(),
            performance: performance.percent(),
            accessibility: accessibility.percent(),
        },
        issues,
        broken_links,
        recommendations,
        leads: Vec::new(),
        advisories: Vec::new(),
        pages_analyzed: 0,
        performance_insights: None,
        generated_at: Utc::now(),
    }
}
