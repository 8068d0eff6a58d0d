//! Area analysis with a stubbed places provider

use crate::common::{html, test_config};
use async_trait::async_trait;
use std::sync::Arc;
use sumi_scout::collaborators::{AreaQuery, PlaceCandidate, PlacesProvider};
use sumi_scout::{Orchestrator, ScoutError, ScrapeRequest};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StubPlaces(Vec<PlaceCandidate>);

#[async_trait]
impl PlacesProvider for StubPlaces {
    async fn search(&self, _query: &AreaQuery) -> Result<Vec<PlaceCandidate>, ScoutError> {
        Ok(self.0.clone())
    }
}

fn candidate(name: &str, website: Option<String>, phone: &str) -> PlaceCandidate {
    PlaceCandidate {
        name: name.to_string(),
        address: Some("100 Congress Ave, Austin, TX".to_string()),
        phone: Some(phone.to_string()),
        website,
    }
}

#[tokio::test]
async fn test_area_analysis_mixes_sites_and_place_leads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Acme Family Clinic | Austin</title></head>
            <body><h1>Acme Family Clinic</h1><p>Email front@acmeclinic.org</p></body></html>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let places = StubPlaces(vec![
        candidate(
            "Acme Family Clinic",
            Some(format!("{}/", mock_server.uri())),
            "512-555-0100",
        ),
        candidate("Downtown Dental", None, "512.555.0101"),
        candidate(
            "Broken Site Dental",
            Some(format!("{}/down", mock_server.uri())),
            "512 555 0102",
        ),
    ]);

    let orchestrator = Orchestrator::builder(test_config(1))
        .places_provider(Arc::new(places))
        .build()
        .unwrap();
    let request = ScrapeRequest::location("Austin, TX", 10, 5, "TX");

    let report = orchestrator
        .run_area_analysis(&request)
        .await
        .expect("area analysis should succeed");

    assert_eq!(report.query, "Austin, TX");
    assert_eq!(report.sites.len(), 1);
    assert!(report.sites[0]
        .leads
        .iter()
        .all(|lead| lead.email.is_none()));

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].business_name, "Broken Site Dental");

    let names: Vec<_> = report
        .place_leads
        .iter()
        .filter_map(|lead| lead.business_name.as_deref())
        .collect();
    assert_eq!(names, vec!["Downtown Dental", "Broken Site Dental"]);
    assert_eq!(
        report.place_leads[0].phone.as_deref(),
        Some("(512) 555-0101")
    );
    assert_eq!(report.place_leads[0].source_url, "places:Austin, TX");
}

#[tokio::test]
async fn test_area_analysis_respects_max_results() {
    let places = StubPlaces(vec![
        candidate("First Fitness", None, "512-555-0110"),
        candidate("Second Fitness", None, "512-555-0111"),
        candidate("Third Fitness", None, "512-555-0112"),
    ]);

    let orchestrator = Orchestrator::builder(test_config(1))
        .places_provider(Arc::new(places))
        .build()
        .unwrap();
    let request = ScrapeRequest::keyword("gyms near me", 2, "NY");

    let report = orchestrator.run_area_analysis(&request).await.unwrap();

    assert!(report.sites.is_empty());
    assert_eq!(report.place_leads.len(), 2);
    assert_eq!(report.all_leads().count(), 2);
}

#[tokio::test]
async fn test_area_analysis_without_places_provider_fails() {
    let orchestrator = Orchestrator::builder(test_config(1)).build().unwrap();
    let request = ScrapeRequest::location("78701", 5, 5, "TX");

    assert!(matches!(
        orchestrator.run_area_analysis(&request).await,
        Err(ScoutError::Collaborator(_))
    ));
}
