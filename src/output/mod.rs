//! Output module for presenting analysis results
//!
//! This module handles:
//! - Markdown reports for site and area analyses
//! - Console summaries printed by the CLI
//! - JSON serialization of reports

mod markdown;

pub use markdown::{
    format_area_markdown_report, format_markdown_report, severity_breakdown,
    write_area_markdown_report, write_markdown_report,
};

use crate::scoring::SiteScoreReport;
use crate::ScoutError;
use serde::Serialize;

/// Serializes any report as pretty-printed JSON
pub fn to_json<T: Serialize>(report: &T) -> Result<String, ScoutError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Prints a site report to stdout
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report_summary(report: &SiteScoreReport) {
    println!("=== Site Analysis: {} ===\n", report.url);

    println!("Overall score: {}/100", report.overall_score);
    let scores = &report.category_scores;
    println!("  Technical:     {}", scores.technical);
    println!("  Content:       {}", scores.content);
    println!("  Performance:   {}", scores.performance);
    println!("  Accessibility: {}", scores.accessibility);
    println!();

    println!("Pages analyzed: {}", report.pages_analyzed);
    for (severity, count) in severity_breakdown(report) {
        println!("  {} severity issues: {}", severity, count);
    }
    println!("  Broken links: {}", report.broken_links.len());
    println!();

    if !report.advisories.is_empty() {
        println!("Advisories:");
        for advisory in &report.advisories {
            println!("  - {}", advisory);
        }
        println!();
    }

    if !report.recommendations.is_empty() {
        println!("Recommendations:");
        for (i, recommendation) in report.recommendations.iter().enumerate() {
            println!("  {}. {}", i + 1, recommendation);
        }
        println!();
    }

    for lead in &report.leads {
        println!(
            "Lead: {} | {} | {} | {}",
            lead.business_name.as_deref().unwrap_or("-"),
            lead.phone.as_deref().unwrap_or("-"),
            lead.email.as_deref().unwrap_or("-"),
            lead.address.as_deref().unwrap_or("-")
        );
    }
}
