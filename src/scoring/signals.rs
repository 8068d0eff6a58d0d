//! Inputs to the scoring engine, one struct per category

use crate::audit::PageMetrics;
use crate::collaborators::PerformanceInsights;
use std::time::Duration;

/// Site-wide technical signals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnicalSignals {
    pub has_ssl: bool,
    pub has_sitemap: bool,
    pub has_robots_txt: bool,
    pub has_structured_data: bool,
    pub mobile_friendly: bool,
    /// External performance score (0-100); `None` when the provider was unavailable
    pub performance_score: Option<f64>,
}

/// On-page content signals taken from the seed page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSignals {
    pub h1_count: usize,
    pub title_length: usize,
    pub meta_description_length: Option<usize>,
    pub word_count: usize,
    pub distinct_heading_levels: usize,
}

impl ContentSignals {
    pub fn from_metrics(metrics: &PageMetrics) -> Self {
        Self {
            h1_count: metrics.h1_count,
            title_length: metrics.title_length(),
            meta_description_length: metrics.meta_description_length(),
            word_count: metrics.word_count,
            distinct_heading_levels: metrics.distinct_heading_levels(),
        }
    }
}

/// Load measurements of the seed page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformanceSignals {
    pub load_time: Duration,
    pub page_size_bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibilitySignals {
    pub images_missing_alt: usize,
    pub unlabeled_controls: usize,
    pub has_lang: bool,
}

impl AccessibilitySignals {
    pub fn from_metrics(metrics: &PageMetrics) -> Self {
        Self {
            images_missing_alt: metrics.images_missing_alt,
            unlabeled_controls: metrics.unlabeled_controls,
            has_lang: metrics.has_lang,
        }
    }
}

/// Everything the engine scores a site on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSignals {
    pub technical: TechnicalSignals,
    pub content: ContentSignals,
    pub performance: PerformanceSignals,
    pub accessibility: AccessibilitySignals,
}

impl SiteSignals {
    /// Builds signals from the seed page measurements and the site probes
    ///
    /// # Arguments
    ///
    /// * `metrics` - Measurements of the seed page
    /// * `has_ssl` - Whether the seed page was served over HTTPS
    /// * `has_sitemap` - Whether `/sitemap.xml` exists
    /// * `has_robots_txt` - Whether robots.txt was served with status 200
    /// * `load_time` - Time to fetch the seed page
    /// * `page_size_bytes` - Size of the seed page body
    /// * `insights` - External performance insights, if the provider answered
    #[allow(clippy::too_many_arguments)]
    pub fn collect(
        metrics: &PageMetrics,
        has_ssl: bool,
        has_sitemap: bool,
        has_robots_txt: bool,
        load_time: Duration,
        page_size_bytes: usize,
        insights: Option<&PerformanceInsights>,
    ) -> Self {
        Self {
            technical: TechnicalSignals {
                has_ssl,
                has_sitemap,
                has_robots_txt,
                has_structured_data: metrics.has_structured_data,
                mobile_friendly: metrics.is_mobile_friendly(),
                performance_score: insights.map(PerformanceInsights::clamped_score),
            },
            content: ContentSignals::from_metrics(metrics),
            performance: PerformanceSignals {
                load_time,
                page_size_bytes,
            },
            accessibility: AccessibilitySignals::from_metrics(metrics),
        }
    }
}
