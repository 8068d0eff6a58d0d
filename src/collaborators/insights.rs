//! External performance-insights provider

use crate::ScoutError;
use async_trait::async_trait;
use serde::Serialize;
use url::Url;

/// Lab metrics reported by a performance-insights service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceInsights {
    /// Performance category score, 0-100
    pub performance_score: f64,
    pub first_contentful_paint_ms: Option<f64>,
    pub largest_contentful_paint_ms: Option<f64>,
    pub cumulative_layout_shift: Option<f64>,
    pub total_blocking_time_ms: Option<f64>,
}

impl PerformanceInsights {
    /// The score clamped into 0-100; NaN counts as 0
    pub fn clamped_score(&self) -> f64 {
        if self.performance_score.is_nan() {
            0.0
        } else {
            self.performance_score.clamp(0.0, 100.0)
        }
    }
}

/// Source of performance insights for a URL
///
/// Callers must tolerate errors: an unavailable provider only removes its
/// contribution from scoring.
#[async_trait]
pub trait PerformanceProvider: Send + Sync {
    async fn insights(&self, url: &Url) -> Result<PerformanceInsights, ScoutError>;
}

/// Provider used when no insights service is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailablePerformance;

#[async_trait]
impl PerformanceProvider for UnavailablePerformance {
    async fn insights(&self, _url: &Url) -> Result<PerformanceInsights, ScoutError> {
        Err(ScoutError::Collaborator(
            "no performance insights provider configured".to_string(),
        ))
    }
}
