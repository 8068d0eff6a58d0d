//! Scoring a parsed page without a server

use crate::common::reference_page;
use std::time::Duration;
use sumi_scout::audit::{run_checks, PageMetrics};
use sumi_scout::crawler::PageDocument;
use sumi_scout::scoring::{score, SiteSignals};

fn metrics_of(body: &str) -> PageMetrics {
    PageMetrics::from_document(&PageDocument::parse(body))
}

#[test]
fn test_reference_page_earns_full_marks() {
    let body = reference_page();
    let metrics = metrics_of(&body);

    assert!(run_checks(&metrics).is_empty());

    let signals = SiteSignals::collect(
        &metrics,
        true,
        true,
        true,
        Duration::from_millis(300),
        body.len(),
        None,
    );
    let report = score("https://clinic.example/", &signals, vec![], vec![]);

    assert_eq!(report.category_scores.technical, 100);
    assert_eq!(report.category_scores.content, 100);
    assert_eq!(report.category_scores.performance, 100);
    assert_eq!(report.category_scores.accessibility, 100);
    assert_eq!(report.overall_score, 100);
    assert!(report.recommendations.is_empty());
}

#[test]
fn test_defects_lower_content_and_accessibility() {
    let body = r#"<html><head><title>Acme</title></head>
        <body><h1>Acme</h1><h3>Hours</h3><img src="a.png"><img src="b.png" alt=" "></body></html>"#;
    let metrics = metrics_of(body);

    let descriptions: Vec<String> = run_checks(&metrics)
        .into_iter()
        .map(|finding| finding.description)
        .collect();
    assert!(descriptions.contains(&"Missing meta description".to_string()));
    assert!(descriptions.contains(&"Heading hierarchy is broken".to_string()));
    assert!(descriptions.contains(&"2 image(s) missing alt text".to_string()));

    let signals = SiteSignals::collect(
        &metrics,
        true,
        true,
        true,
        Duration::from_millis(300),
        body.len(),
        None,
    );
    let report = score("https://clinic.example/", &signals, vec![], vec![]);

    // Only the single H1 passes among the content checks
    assert_eq!(report.category_scores.content, 20);
    // No lang, two images without alt
    assert_eq!(report.category_scores.accessibility, 50);
    assert!(report.overall_score < 100);
}
