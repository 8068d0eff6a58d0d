//! Shared fixtures for the integration tests

use sumi_scout::config::{Config, UserAgentConfig};
use wiremock::ResponseTemplate;

/// A configuration tuned for a local mock server: no pacing, short timeouts
pub fn test_config(max_pages: usize) -> Config {
    let mut config = Config::new(UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    });
    config.crawler.max_pages = max_pages;
    config.crawler.minimum_interval = 0;
    config.crawler.page_timeout = 3_000;
    config.crawler.robots_timeout = 1_000;
    config.crawler.link_check_timeout = 1_000;
    config
}

/// An HTML response with the given body
pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

/// A page with none of the defects the analyzer reports
///
/// Earns every content and accessibility point; the technical points it can
/// earn depend on how it is served.
pub fn reference_page() -> String {
    let services = "Our family doctors offer checkups, vaccinations and same day visits \
                    for patients of every age. "
        .repeat(22);

    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<title>Acme Family Clinic | Primary Care in Austin</title>
<meta name="description" content="Acme Family Clinic offers same-day primary care, checkups, vaccinations and lab work for children and adults in downtown Austin, six days a week.">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta property="og:title" content="Acme Family Clinic">
<meta property="og:description" content="Primary care in Austin">
<meta property="og:image" content="https://clinic.example/og.png">
<script type="application/ld+json">{{"@context":"https://schema.org","@type":"MedicalClinic","name":"Acme Family Clinic"}}</script>
</head><body>
<h1>Acme Family Clinic</h1>
<img src="/team.jpg" alt="Our care team">
<h2>Services</h2>
<p>{}</p>
<h3>Hours</h3>
<p>Open weekdays from eight to six.</p>
<form><label for="email">Email</label><input id="email" type="email"></form>
</body></html>"#,
        services
    )
}
