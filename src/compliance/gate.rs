use crate::compliance::rules::{JurisdictionRuleSet, RuleBook};
use crate::config::Config;
use crate::url::parse_target_url;
use serde::Serialize;

/// Host keywords that mark a site as healthcare-related
const HEALTHCARE_HOST_KEYWORDS: &[&str] = &["health", "medical", "clinic", "doctor"];

const CONSENT_ADVISORY: &str = "Consent may be required for data collection in this state";
const HEALTHCARE_ADVISORY: &str =
    "Healthcare website detected - additional compliance requirements may apply";

/// What the caller wants scraped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    /// A single website, `target` is its URL
    Individual,
    /// Businesses around an address or zip code
    Location,
    /// Businesses matching a search phrase
    Keyword,
}

/// An immutable scrape request, validated once by the compliance gate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeRequest {
    pub kind: RequestKind,
    pub target: String,
    pub radius_miles: Option<u32>,
    pub max_results: Option<u32>,
    pub jurisdiction: String,
}

impl ScrapeRequest {
    pub fn individual(url: &str, jurisdiction: &str) -> Self {
        Self {
            kind: RequestKind::Individual,
            target: url.to_string(),
            radius_miles: None,
            max_results: None,
            jurisdiction: jurisdiction.to_string(),
        }
    }

    pub fn location(area: &str, radius_miles: u32, max_results: u32, jurisdiction: &str) -> Self {
        Self {
            kind: RequestKind::Location,
            target: area.to_string(),
            radius_miles: Some(radius_miles),
            max_results: Some(max_results),
            jurisdiction: jurisdiction.to_string(),
        }
    }

    pub fn keyword(phrase: &str, max_results: u32, jurisdiction: &str) -> Self {
        Self {
            kind: RequestKind::Keyword,
            target: phrase.to_string(),
            radius_miles: None,
            max_results: Some(max_results),
            jurisdiction: jurisdiction.to_string(),
        }
    }
}

/// Outcome of evaluating one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceDecision {
    pub allowed: bool,
    pub violated_rules: Vec<String>,
    pub advisories: Vec<String>,
    pub jurisdiction_rules: JurisdictionRuleSet,
}

/// Pure decision function over a request and the day's usage count
#[derive(Debug, Clone)]
pub struct ComplianceGate {
    rules: RuleBook,
    max_radius: u32,
    max_results_per_request: u32,
}

impl ComplianceGate {
    pub fn new(rules: RuleBook, max_radius: u32, max_results_per_request: u32) -> Self {
        Self {
            rules,
            max_radius,
            max_results_per_request,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            RuleBook::with_overrides(&config.jurisdictions),
            config.compliance.max_radius,
            config.compliance.max_results_per_request,
        )
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Evaluates every rule and collects all violations
    ///
    /// Rules are not short-circuited so the caller sees the complete set of
    /// reasons. The usage count must come from the usage store; this function
    /// performs no I/O.
    ///
    /// # Arguments
    ///
    /// * `request` - The request to evaluate
    /// * `today_usage` - Requests already made today in the request's jurisdiction
    ///
    /// # Returns
    ///
    /// A decision whose `allowed` flag is true only when no rule was violated
    pub fn evaluate(&self, request: &ScrapeRequest, today_usage: u32) -> ComplianceDecision {
        let rules = self.rules.lookup(&request.jurisdiction);
        let mut violated_rules = Vec::new();
        let mut advisories = Vec::new();

        if today_usage >= rules.max_requests_per_day {
            violated_rules.push(format!(
                "Daily limit of {} requests exceeded",
                rules.max_requests_per_day
            ));
        }

        if request.kind == RequestKind::Individual && rules.requires_consent {
            advisories.push(CONSENT_ADVISORY.to_string());
        }

        if request.radius_miles.is_some_and(|r| r > self.max_radius) {
            violated_rules.push(format!("Radius cannot exceed {} miles", self.max_radius));
        }

        if request
            .max_results
            .is_some_and(|n| n > self.max_results_per_request)
        {
            violated_rules.push(format!(
                "Maximum {} leads per request",
                self.max_results_per_request
            ));
        }

        match request.kind {
            RequestKind::Individual => match parse_target_url(&request.target) {
                Ok(url) => {
                    let host = url.host_str().unwrap_or_default();
                    if HEALTHCARE_HOST_KEYWORDS.iter().any(|k| host.contains(k)) {
                        advisories.push(HEALTHCARE_ADVISORY.to_string());
                    }
                }
                Err(_) => violated_rules.push("Invalid URL format".to_string()),
            },
            RequestKind::Location | RequestKind::Keyword => {
                if request.target.trim().is_empty() {
                    violated_rules.push("Search target cannot be empty".to_string());
                }
            }
        }

        ComplianceDecision {
            allowed: violated_rules.is_empty(),
            violated_rules,
            advisories,
            jurisdiction_rules: rules.clone(),
        }
    }
}

impl Default for ComplianceGate {
    fn default() -> Self {
        Self::new(RuleBook::builtin(), 25, 50)
    }
}
