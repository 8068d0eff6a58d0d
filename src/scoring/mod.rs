//! Scoring engine
//!
//! Reduces technical, content, performance and accessibility signals into a
//! weighted 0-100 score with an ordered recommendation list. A missing
//! external performance score is substituted neutrally, never an error.

mod engine;
mod report;
mod signals;

pub use engine::{
    accessibility_points, content_points, performance_points, recommendations, score,
    technical_points, Points,
};
pub use report::{AreaReport, CandidateFailure, CategoryScores, Recommendation, SiteScoreReport};
pub use signals::{
    AccessibilitySignals, ContentSignals, PerformanceSignals, SiteSignals, TechnicalSignals,
};
