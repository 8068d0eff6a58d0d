use crate::audit::{BrokenLinkRecord, PageIssue, Severity};
use crate::collaborators::PerformanceInsights;
use crate::leads::ExtractedLead;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-category scores, each 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
    pub technical: u8,
    pub content: u8,
    pub performance: u8,
    pub accessibility: u8,
}

/// A suggested fix with its priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub priority: Severity,
    pub text: String,
}

impl Recommendation {
    pub fn new(priority: Severity, text: impl Into<String>) -> Self {
        Self {
            priority,
            text: text.into(),
        }
    }
}

/// The result of one site analysis
#[derive(Debug, Clone, Serialize)]
pub struct SiteScoreReport {
    pub url: String,
    /// Always within 0-100
    pub overall_score: u8,
    pub category_scores: CategoryScores,
    pub issues: Vec<PageIssue>,
    pub broken_links: Vec<BrokenLinkRecord>,
    /// Highest priority first
    pub recommendations: Vec<String>,
    pub leads: Vec<ExtractedLead>,
    /// Non-blocking compliance notes
    pub advisories: Vec<String>,
    pub pages_analyzed: usize,
    pub performance_insights: Option<PerformanceInsights>,
    pub generated_at: DateTime<Utc>,
}

impl SiteScoreReport {
    /// Number of issues at the given severity
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// A candidate business whose site analysis failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFailure {
    pub business_name: String,
    pub website: String,
    pub reason: String,
}

/// The result of a location or keyword analysis
#[derive(Debug, Clone, Serialize)]
pub struct AreaReport {
    /// The searched location or keyword
    pub query: String,
    /// One report per analyzed candidate website
    pub sites: Vec<SiteScoreReport>,
    /// Leads built from places data for candidates that were not analyzed
    pub place_leads: Vec<ExtractedLead>,
    pub failures: Vec<CandidateFailure>,
    pub advisories: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl AreaReport {
    /// Every lead in the report: site leads first, then places leads
    pub fn all_leads(&self) -> impl Iterator<Item = &ExtractedLead> {
        self.sites
            .iter()
            .flat_map(|site| site.leads.iter())
            .chain(self.place_leads.iter())
    }
}
