//! End-to-end site analysis against a mock server

use crate::common::{html, reference_page, test_config};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use sumi_scout::audit::Severity;
use sumi_scout::collaborators::{
    MemoryUsageStore, PerformanceInsights, PerformanceProvider, UsageStore,
};
use sumi_scout::{FetchError, Orchestrator, ScoutError, ScrapeRequest};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLINIC_PAGE: &str = r#"<html lang="en"><head><title>Ac</title>
<meta name="viewport" content="width=device-width, initial-scale=1"></head>
<body><h1>Acme Family Clinic</h1>
<p>Call (555) 867-5309 or email hello@acmeclinic.org</p>
<a href="/missing">Old page</a></body></html>"#;

struct FixedInsights(f64);

#[async_trait]
impl PerformanceProvider for FixedInsights {
    async fn insights(&self, _url: &Url) -> Result<PerformanceInsights, ScoutError> {
        Ok(PerformanceInsights {
            performance_score: self.0,
            first_contentful_paint_ms: Some(900.0),
            largest_contentful_paint_ms: Some(1800.0),
            cumulative_layout_shift: Some(0.02),
            total_blocking_time_ms: None,
        })
    }
}

#[tokio::test]
async fn test_seed_page_analysis() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(CLINIC_PAGE))
        .mount(&mock_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(1)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    let report = orchestrator
        .run_analysis(&request)
        .await
        .expect("analysis should succeed");

    assert_eq!(report.pages_analyzed, 1);
    assert_eq!(report.count_severity(Severity::High), 2);
    assert!(report
        .issues
        .iter()
        .any(|i| i.description == "Missing or too short title tag"));
    assert!(report
        .issues
        .iter()
        .any(|i| i.description == "Missing meta description"));
    assert!(!report
        .issues
        .iter()
        .any(|i| i.description.contains("viewport")));

    assert_eq!(report.broken_links.len(), 1);
    let broken = &report.broken_links[0];
    assert!(broken.broken_url.ends_with("/missing"));
    assert_eq!(broken.status_code, Some(404));
    assert_eq!(broken.error_reason.as_deref(), Some("Not Found"));
    assert_eq!(broken.found_on_page_title.as_deref(), Some("Ac"));
    assert_eq!(broken.anchor_text.as_deref(), Some("Old page"));

    assert!(report.overall_score < 100);
    assert!(report.performance_insights.is_none());
    assert!(report.advisories.is_empty());

    assert_eq!(report.leads.len(), 1);
    let lead = &report.leads[0];
    assert_eq!(lead.business_name.as_deref(), Some("Acme Family Clinic"));
    assert_eq!(lead.phone.as_deref(), Some("(555) 867-5309"));
    assert_eq!(lead.email.as_deref(), Some("hello@acmeclinic.org"));
}

#[tokio::test]
async fn test_leads_redacted_by_jurisdiction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(CLINIC_PAGE))
        .mount(&mock_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(1)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "CA");

    let report = orchestrator.run_analysis(&request).await.unwrap();

    assert_eq!(report.leads.len(), 1);
    assert_eq!(report.leads[0].email, None);
    assert_eq!(report.leads[0].phone.as_deref(), Some("(555) 867-5309"));
    assert!(report
        .advisories
        .iter()
        .any(|a| a.contains("Consent may be required")));
}

#[tokio::test]
async fn test_compliance_rejection_makes_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/"))
        .respond_with(html(CLINIC_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let usage = Arc::new(MemoryUsageStore::with_count("TX", 150));
    let orchestrator = Orchestrator::builder(test_config(1))
        .usage_store(usage)
        .build()
        .unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "TX");

    match orchestrator.run_analysis(&request).await {
        Err(ScoutError::ComplianceRejected(decision)) => {
            assert!(!decision.allowed);
            assert_eq!(
                decision.violated_rules,
                vec!["Daily limit of 150 requests exceeded".to_string()]
            );
        }
        other => panic!("expected ComplianceRejected, got {:?}", other.map(|r| r.url)),
    }
}

#[tokio::test]
async fn test_usage_recorded_after_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(CLINIC_PAGE))
        .mount(&mock_server)
        .await;

    let usage = Arc::new(MemoryUsageStore::new());
    let orchestrator = Orchestrator::builder(test_config(1))
        .usage_store(usage.clone())
        .build()
        .unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "ny");

    orchestrator.run_analysis(&request).await.unwrap();

    assert_eq!(usage.today_count("NY").await.unwrap(), 1);
    assert_eq!(usage.today_results("NY").await, 1);
}

#[tokio::test]
async fn test_second_run_on_same_host_is_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(CLINIC_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(1);
    config.crawler.minimum_interval = 60_000;
    let orchestrator = Orchestrator::builder(config).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    assert!(orchestrator.run_analysis(&request).await.is_ok());

    match orchestrator.run_analysis(&request).await {
        Err(ScoutError::RateLimited {
            host,
            wait_ms,
            retry_after_secs,
        }) => {
            assert_eq!(host, "127.0.0.1");
            assert!(wait_ms > 0 && wait_ms <= 60_000);
            assert!((1..=60).contains(&retry_after_secs));
        }
        other => panic!("expected RateLimited, got {:?}", other.map(|r| r.url)),
    }
}

#[tokio::test]
async fn test_robots_denial_stops_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: TestBot\nDisallow: /"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(path("/"))
        .respond_with(html(CLINIC_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(1)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    assert!(matches!(
        orchestrator.run_analysis(&request).await,
        Err(ScoutError::RobotsDenied { .. })
    ));
}

#[tokio::test]
async fn test_robots_for_other_agents_is_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: OtherBot\nDisallow: /"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(CLINIC_PAGE))
        .mount(&mock_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(1)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    let report = orchestrator.run_analysis(&request).await.unwrap();
    assert_eq!(report.pages_analyzed, 1);
}

#[tokio::test]
async fn test_seed_failure_is_terminal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(5)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    match orchestrator.run_analysis(&request).await {
        Err(ScoutError::SeedFetch { source, .. }) => {
            assert!(matches!(source, FetchError::HttpError { status: 500, .. }));
        }
        other => panic!("expected SeedFetch, got {:?}", other.map(|r| r.url)),
    }
}

#[tokio::test]
async fn test_failed_sibling_page_degrades_to_issue() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Acme Family Clinic | Home</title></head><body>
            <h1>Acme Family Clinic</h1>
            <a href="/about">About</a>
            <a href="/gone">Gone</a>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(path("/about"))
        .respond_with(html(
            "<html><head><title>About Acme Family Clinic</title></head>\
             <body><h1>About us</h1></body></html>",
        ))
        .mount(&mock_server)
        .await;
    Mock::given(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(5)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    let report = orchestrator.run_analysis(&request).await.unwrap();

    assert_eq!(report.pages_analyzed, 3);
    let failures: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.description == "Page could not be loaded")
        .collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].page_url.ends_with("/gone"));
    assert_eq!(failures[0].severity, Severity::High);

    assert_eq!(report.broken_links.len(), 1);
    assert_eq!(report.broken_links[0].status_code, Some(500));
}

#[tokio::test]
async fn test_performance_insights_included() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(CLINIC_PAGE))
        .mount(&mock_server)
        .await;

    let without = Orchestrator::builder(test_config(1)).build().unwrap();
    let with = Orchestrator::builder(test_config(1))
        .performance_provider(Arc::new(FixedInsights(100.0)))
        .build()
        .unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    let baseline = without.run_analysis(&request).await.unwrap();
    let enriched = with.run_analysis(&request).await.unwrap();

    let insights = enriched
        .performance_insights
        .as_ref()
        .expect("insights should be attached");
    assert_eq!(insights.performance_score, 100.0);
    assert!(enriched.category_scores.technical > baseline.category_scores.technical);
}

#[tokio::test]
async fn test_cancellation_abandons_slow_seed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(CLINIC_PAGE).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let mut config = test_config(1);
    config.crawler.page_timeout = 20_000;
    let orchestrator = Orchestrator::builder(config).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = orchestrator.run_analysis_with_cancel(&request, cancel).await;

    assert!(matches!(result, Err(ScoutError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_robots_disallowed_siblings_are_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Acme Family Clinic | Home</title></head><body>
            <h1>Acme Family Clinic</h1>
            <a href="/private">Staff</a>
            <a href="/about">About</a>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(html("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(path("/about"))
        .respond_with(html("<html><head><title>About Acme</title></head></html>"))
        .mount(&mock_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(5)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    let report = orchestrator.run_analysis(&request).await.unwrap();

    assert_eq!(report.pages_analyzed, 2);
    assert!(report
        .issues
        .iter()
        .all(|i| !i.page_url.ends_with("/private")));
}

#[tokio::test]
async fn test_reference_site_outscores_defective_clinic() {
    let reference_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(reference_page()))
        .mount(&reference_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(&reference_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&reference_server)
        .await;

    let clinic_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(CLINIC_PAGE))
        .mount(&clinic_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(1)).build().unwrap();
    let reference = orchestrator
        .run_analysis(&ScrapeRequest::individual(
            &format!("{}/", reference_server.uri()),
            "NY",
        ))
        .await
        .unwrap();
    let clinic = Orchestrator::builder(test_config(1))
        .build()
        .unwrap()
        .run_analysis(&ScrapeRequest::individual(
            &format!("{}/", clinic_server.uri()),
            "NY",
        ))
        .await
        .unwrap();

    assert!(reference.issues.is_empty());
    assert!(reference.broken_links.is_empty());
    assert_eq!(reference.category_scores.content, 100);
    assert_eq!(reference.category_scores.performance, 100);
    assert_eq!(reference.category_scores.accessibility, 100);
    // Every technical point except SSL
    assert_eq!(reference.category_scores.technical, 77);

    assert!(clinic.category_scores.content < reference.category_scores.content);
    assert!(clinic.overall_score < reference.overall_score);
}

#[tokio::test]
async fn test_contact_sentence_becomes_full_lead() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            "<html><body><p>Call us at (555) 867-5309 or email info@clinic.example, \
             123 Main Street</p></body></html>",
        ))
        .mount(&mock_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(1)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    let report = orchestrator.run_analysis(&request).await.unwrap();

    assert_eq!(report.leads.len(), 1);
    let lead = &report.leads[0];
    assert_eq!(lead.phone.as_deref(), Some("(555) 867-5309"));
    assert_eq!(lead.email.as_deref(), Some("info@clinic.example"));
    assert_eq!(lead.address.as_deref(), Some("123 Main Street"));
}

#[tokio::test]
async fn test_non_html_sibling_is_skipped_quietly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Acme Family Clinic | Home</title></head><body>
            <h1>Acme Family Clinic</h1>
            <a href="/feed">Feed</a>
            <a href="/about">About</a>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;
    Mock::given(path("/about"))
        .respond_with(html("<html><head><title>About Acme</title></head></html>"))
        .mount(&mock_server)
        .await;

    let orchestrator = Orchestrator::builder(test_config(5)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", mock_server.uri()), "NY");

    let report = orchestrator.run_analysis(&request).await.unwrap();

    assert_eq!(report.pages_analyzed, 2);
    assert!(!report
        .issues
        .iter()
        .any(|i| i.description == "Page could not be loaded"));
    assert!(report.broken_links.is_empty());
}

#[tokio::test]
async fn test_redirected_seed_uses_final_host_robots() {
    let old_site = MockServer::start().await;
    let new_site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/", new_site.uri()).as_str()),
        )
        .mount(&old_site)
        .await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&new_site)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Acme Family Clinic | Home</title></head><body>
            <h1>Acme Family Clinic</h1>
            <a href="/private">Staff</a>
            <a href="/about">About</a>
            </body></html>"#,
        ))
        .mount(&new_site)
        .await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(html("<html></html>"))
        .expect(0)
        .mount(&new_site)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&new_site)
        .await;
    Mock::given(path("/about"))
        .respond_with(html("<html><head><title>About Acme</title></head></html>"))
        .mount(&new_site)
        .await;

    let orchestrator = Orchestrator::builder(test_config(5)).build().unwrap();
    let request = ScrapeRequest::individual(&format!("{}/", old_site.uri()), "NY");

    let report = orchestrator.run_analysis(&request).await.unwrap();

    assert!(report.url.starts_with(&new_site.uri()));
    assert_eq!(report.pages_analyzed, 2);
}
