use serde::Serialize;
use std::fmt;

/// What part of the page an issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    MetaTags,
    ContentStructure,
    Images,
    Content,
    Mobile,
    SocialMedia,
    /// The page itself could not be loaded
    Availability,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MetaTags => "meta-tags",
            Self::ContentStructure => "content-structure",
            Self::Images => "images",
            Self::Content => "content",
            Self::Mobile => "mobile",
            Self::SocialMedia => "social-media",
            Self::Availability => "availability",
        };
        f.write_str(name)
    }
}

/// Impact of a defect
///
/// Declaration order is priority order: sorting ascending puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(name)
    }
}

/// A defect found on one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageIssue {
    pub page_url: String,
    pub page_title: Option<String>,
    pub category: IssueCategory,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

impl PageIssue {
    /// The issue as one actionable sentence: "description: fix"
    pub fn as_recommendation(&self) -> String {
        format!("{}: {}", self.description, self.recommendation)
    }
}

/// An outbound link that failed verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLinkRecord {
    pub broken_url: String,
    pub found_on_page_url: String,
    pub found_on_page_title: Option<String>,
    pub status_code: Option<u16>,
    pub error_reason: Option<String>,
    pub anchor_text: Option<String>,
}
