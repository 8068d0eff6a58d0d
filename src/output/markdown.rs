//! Markdown report generation
//!
//! Renders human-readable reports of site and area analyses: scores,
//! recommendations, issues grouped by severity, broken links and leads.

use crate::audit::Severity;
use crate::leads::ExtractedLead;
use crate::scoring::{AreaReport, SiteScoreReport};
use crate::ScoutError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report for a site analysis
///
/// # Arguments
///
/// * `report` - The site report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(ScoutError)` - Failed to write the file
pub fn write_markdown_report(
    report: &SiteScoreReport,
    output_path: &Path,
) -> Result<(), ScoutError> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote markdown report to {}", output_path.display());
    Ok(())
}

/// Writes a markdown report for an area analysis
pub fn write_area_markdown_report(
    report: &AreaReport,
    output_path: &Path,
) -> Result<(), ScoutError> {
    let mut file = File::create(output_path)?;
    file.write_all(format_area_markdown_report(report).as_bytes())?;

    tracing::info!("Wrote markdown report to {}", output_path.display());
    Ok(())
}

/// Formats a site report as markdown
pub fn format_markdown_report(report: &SiteScoreReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Site Analysis: {}\n\n", report.url));
    push_site_body(&mut md, report, "##");
    md
}

/// Formats an area report as markdown
pub fn format_area_markdown_report(report: &AreaReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Area Analysis: {}\n\n", report.query));
    md.push_str(&format!("- **Generated**: {}\n", report.generated_at.to_rfc3339()));
    md.push_str(&format!("- **Sites Analyzed**: {}\n", report.sites.len()));
    md.push_str(&format!("- **Places Leads**: {}\n", report.place_leads.len()));
    md.push_str(&format!("- **Failed Candidates**: {}\n\n", report.failures.len()));

    push_advisories(&mut md, &report.advisories, "##");

    for site in &report.sites {
        md.push_str(&format!("## {}\n\n", site.url));
        push_site_body(&mut md, site, "###");
    }

    if !report.place_leads.is_empty() {
        md.push_str("## Leads From Places Data\n\n");
        push_lead_table(&mut md, &report.place_leads);
    }

    if !report.failures.is_empty() {
        md.push_str("## Failed Candidates\n\n");
        md.push_str("| Business | Website | Reason |\n");
        md.push_str("|----------|---------|--------|\n");
        for failure in &report.failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                cell(&failure.business_name),
                failure.website,
                cell(&failure.reason)
            ));
        }
        md.push('\n');
    }

    md
}

fn push_site_body(md: &mut String, report: &SiteScoreReport, heading: &str) {
    md.push_str(&format!("- **Overall Score**: {}/100\n", report.overall_score));
    md.push_str(&format!("- **Pages Analyzed**: {}\n", report.pages_analyzed));
    md.push_str(&format!("- **Generated**: {}\n\n", report.generated_at.to_rfc3339()));

    md.push_str(&format!("{} Category Scores\n\n", heading));
    md.push_str("| Category | Score |\n");
    md.push_str("|----------|-------|\n");
    let scores = &report.category_scores;
    md.push_str(&format!("| Technical | {} |\n", scores.technical));
    md.push_str(&format!("| Content | {} |\n", scores.content));
    md.push_str(&format!("| Performance | {} |\n", scores.performance));
    md.push_str(&format!("| Accessibility | {} |\n\n", scores.accessibility));

    if let Some(insights) = &report.performance_insights {
        md.push_str(&format!(
            "External performance score: {:.0}\n\n",
            insights.clamped_score()
        ));
    }

    push_advisories(md, &report.advisories, heading);

    if !report.recommendations.is_empty() {
        md.push_str(&format!("{} Recommendations\n\n", heading));
        for (i, recommendation) in report.recommendations.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, recommendation));
        }
        md.push('\n');
    }

    if !report.issues.is_empty() {
        md.push_str(&format!("{} Issues\n\n", heading));
        md.push_str("| Severity | Category | Page | Issue |\n");
        md.push_str("|----------|----------|------|-------|\n");

        let mut issues: Vec<_> = report.issues.iter().collect();
        issues.sort_by_key(|issue| issue.severity);
        for issue in issues {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                issue.severity,
                issue.category,
                issue.page_url,
                cell(&issue.description)
            ));
        }
        md.push('\n');
    }

    if !report.broken_links.is_empty() {
        md.push_str(&format!("{} Broken Links\n\n", heading));
        md.push_str("| Link | Found On | Status |\n");
        md.push_str("|------|----------|--------|\n");
        for link in &report.broken_links {
            let status = match (link.status_code, &link.error_reason) {
                (Some(code), _) => code.to_string(),
                (None, Some(reason)) => cell(reason),
                (None, None) => "unreachable".to_string(),
            };
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                link.broken_url, link.found_on_page_url, status
            ));
        }
        md.push('\n');
    }

    if !report.leads.is_empty() {
        md.push_str(&format!("{} Leads\n\n", heading));
        push_lead_table(md, &report.leads);
    }
}

fn push_advisories(md: &mut String, advisories: &[String], heading: &str) {
    if advisories.is_empty() {
        return;
    }
    md.push_str(&format!("{} Compliance Advisories\n\n", heading));
    for advisory in advisories {
        md.push_str(&format!("- {}\n", advisory));
    }
    md.push('\n');
}

fn push_lead_table(md: &mut String, leads: &[ExtractedLead]) {
    md.push_str("| Business | Phone | Email | Address | Industry |\n");
    md.push_str("|----------|-------|-------|---------|----------|\n");

    let or_dash = |v: &Option<String>| v.as_deref().map(cell).unwrap_or_else(|| "-".to_string());
    for lead in leads {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            or_dash(&lead.business_name),
            or_dash(&lead.phone),
            or_dash(&lead.email),
            or_dash(&lead.address),
            lead.industry
                .map(|i| i.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
    }
    md.push('\n');
}

/// Escapes pipes so a value stays inside its table cell
fn cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Counts issues per severity, high first
pub fn severity_breakdown(report: &SiteScoreReport) -> [(Severity, usize); 3] {
    [Severity::High, Severity::Medium, Severity::Low].map(|s| (s, report.count_severity(s)))
}
