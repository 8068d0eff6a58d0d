//! Page-level SEO checks
//!
//! Every check is an independent function over the same `PageMetrics`,
//! so adding or removing one never affects the others.

use crate::audit::issue::{IssueCategory, Severity};
use crate::crawler::PageDocument;
use std::collections::BTreeSet;

const MIN_TITLE_CHARS: usize = 10;
const MAX_TITLE_CHARS: usize = 60;
const MIN_META_DESCRIPTION_CHARS: usize = 50;
const MAX_META_DESCRIPTION_CHARS: usize = 160;
const MIN_WORDS: usize = 300;

const OPEN_GRAPH_TAGS: &[&str] = &["og:title", "og:description", "og:image"];

/// Measurements taken from one parsed page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetrics {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub open_graph_complete: bool,
    pub h1_count: usize,
    /// Heading levels in document order
    pub heading_levels: Vec<u8>,
    pub images_missing_alt: usize,
    pub word_count: usize,
    pub viewport: Option<String>,
    pub has_structured_data: bool,
    pub has_lang: bool,
    pub unlabeled_controls: usize,
}

impl PageMetrics {
    pub fn from_document(doc: &PageDocument) -> Self {
        let heading_levels: Vec<u8> = doc.headings().iter().map(|h| h.level).collect();

        Self {
            title: doc.title(),
            meta_description: doc.meta_named("description"),
            open_graph_complete: OPEN_GRAPH_TAGS
                .iter()
                .all(|tag| doc.meta_property(tag).is_some()),
            h1_count: heading_levels.iter().filter(|&&l| l == 1).count(),
            heading_levels,
            images_missing_alt: doc.images_missing_alt(),
            word_count: doc.word_count(),
            viewport: doc.meta_named("viewport"),
            has_structured_data: doc.has_structured_data(),
            has_lang: doc.html_lang().is_some(),
            unlabeled_controls: doc.unlabeled_controls(),
        }
    }

    /// Title length in characters (0 when missing)
    pub fn title_length(&self) -> usize {
        self.title.as_deref().map_or(0, |t| t.chars().count())
    }

    /// Meta description length in characters, if present
    pub fn meta_description_length(&self) -> Option<usize> {
        self.meta_description.as_deref().map(|d| d.chars().count())
    }

    /// How many of H1..H6 appear at least once
    pub fn distinct_heading_levels(&self) -> usize {
        self.heading_levels.iter().collect::<BTreeSet<_>>().len()
    }

    /// True if some heading is more than one level deeper than the one before it
    ///
    /// The document starts at level 0, so a page opening with `<h2>` counts.
    pub fn has_heading_jump(&self) -> bool {
        let mut previous = 0u8;
        for &level in &self.heading_levels {
            if level > previous + 1 {
                return true;
            }
            previous = level;
        }
        false
    }

    /// True if the viewport adapts to the device width
    pub fn is_mobile_friendly(&self) -> bool {
        self.viewport
            .as_deref()
            .is_some_and(|v| v.replace(' ', "").contains("width=device-width"))
    }
}

/// A defect before it is attached to a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub category: IssueCategory,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

impl Finding {
    fn new(
        category: IssueCategory,
        severity: Severity,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            description: description.into(),
            recommendation: recommendation.into(),
        }
    }
}

type Check = fn(&PageMetrics, &mut Vec<Finding>);

/// All checks, in the order their findings are reported
const CHECKS: &[Check] = &[
    check_title,
    check_meta_description,
    check_open_graph,
    check_headings,
    check_images,
    check_content_volume,
    check_viewport,
];

/// Runs every check against the metrics
pub fn run_checks(metrics: &PageMetrics) -> Vec<Finding> {
    let mut findings = Vec::new();
    for check in CHECKS {
        check(metrics, &mut findings);
    }
    findings
}

fn check_title(metrics: &PageMetrics, findings: &mut Vec<Finding>) {
    let length = metrics.title_length();
    if length < MIN_TITLE_CHARS {
        findings.push(Finding::new(
            IssueCategory::MetaTags,
            Severity::High,
            "Missing or too short title tag",
            "Add a descriptive title tag (50-60 characters)",
        ));
    } else if length > MAX_TITLE_CHARS {
        findings.push(Finding::new(
            IssueCategory::MetaTags,
            Severity::Medium,
            "Title tag is too long",
            "Shorten title tag to 50-60 characters",
        ));
    }
}

fn check_meta_description(metrics: &PageMetrics, findings: &mut Vec<Finding>) {
    match metrics.meta_description_length() {
        None => findings.push(Finding::new(
            IssueCategory::MetaTags,
            Severity::High,
            "Missing meta description",
            "Add a meta description (150-160 characters)",
        )),
        Some(length)
            if !(MIN_META_DESCRIPTION_CHARS..=MAX_META_DESCRIPTION_CHARS).contains(&length) =>
        {
            findings.push(Finding::new(
                IssueCategory::MetaTags,
                Severity::Medium,
                "Meta description length not optimal",
                "Optimize meta description to 150-160 characters",
            ))
        }
        Some(_) => {}
    }
}

fn check_open_graph(metrics: &PageMetrics, findings: &mut Vec<Finding>) {
    if !metrics.open_graph_complete {
        findings.push(Finding::new(
            IssueCategory::SocialMedia,
            Severity::Low,
            "Missing Open Graph tags for social sharing",
            "Add og:title, og:description, and og:image tags",
        ));
    }
}

fn check_headings(metrics: &PageMetrics, findings: &mut Vec<Finding>) {
    match metrics.h1_count {
        0 => findings.push(Finding::new(
            IssueCategory::ContentStructure,
            Severity::High,
            "No H1 heading found",
            "Add one H1 heading that describes the page content",
        )),
        1 => {}
        n => findings.push(Finding::new(
            IssueCategory::ContentStructure,
            Severity::Medium,
            format!("Multiple H1 headings found ({})", n),
            "Use only one H1 heading per page",
        )),
    }

    if metrics.has_heading_jump() {
        findings.push(Finding::new(
            IssueCategory::ContentStructure,
            Severity::Low,
            "Heading hierarchy is broken",
            "Maintain proper heading hierarchy (H1 → H2 → H3)",
        ));
    }
}

fn check_images(metrics: &PageMetrics, findings: &mut Vec<Finding>) {
    if metrics.images_missing_alt > 0 {
        findings.push(Finding::new(
            IssueCategory::Images,
            Severity::Medium,
            format!("{} image(s) missing alt text", metrics.images_missing_alt),
            "Add descriptive alt text to all images for accessibility and SEO",
        ));
    }
}

fn check_content_volume(metrics: &PageMetrics, findings: &mut Vec<Finding>) {
    if metrics.word_count < MIN_WORDS {
        findings.push(Finding::new(
            IssueCategory::Content,
            Severity::Medium,
            format!("Thin content detected ({} words)", metrics.word_count),
            "Add more valuable content (aim for 300+ words minimum)",
        ));
    }
}

fn check_viewport(metrics: &PageMetrics, findings: &mut Vec<Finding>) {
    if metrics.viewport.is_none() {
        findings.push(Finding::new(
            IssueCategory::Mobile,
            Severity::High,
            "Missing viewport meta tag",
            r#"Add <meta name="viewport" content="width=device-width, initial-scale=1">"#,
        ));
    }
}
