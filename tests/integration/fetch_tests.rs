//! HTTP-level behavior: page fetches, link checks, robots.txt

use crate::common::{html, test_config};
use std::time::Duration;
use sumi_scout::crawler::{build_http_client, check_link, fetch_page, LinkStatus};
use sumi_scout::politeness::PolitenessController;
use sumi_scout::robots::fetch_robots;
use sumi_scout::FetchError;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(2);

fn client() -> reqwest::Client {
    let config = test_config(1);
    build_http_client(&config.user_agent, config.crawler.max_redirects).unwrap()
}

fn url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
}

#[tokio::test]
async fn test_fetch_page_sends_declared_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(html("<html><head><title>Home</title></head></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = fetch_page(&client(), &url(&mock_server, "/"), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(page.status_code, 200);
    assert!(page.body.contains("<title>Home</title>"));
    assert!(page.size_bytes() > 0);
}

#[tokio::test]
async fn test_fetch_page_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html("<html></html>"))
        .mount(&mock_server)
        .await;

    let page = fetch_page(&client(), &url(&mock_server, "/old"), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(page.url.path(), "/old");
    assert_eq!(page.final_url.path(), "/new");
}

#[tokio::test]
async fn test_fetch_page_rejects_non_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;

    let result = fetch_page(&client(), &url(&mock_server, "/data.json"), TIMEOUT).await;
    assert!(matches!(result, Err(FetchError::NotHtml { .. })));
}

#[tokio::test]
async fn test_fetch_page_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<html></html>").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let result = fetch_page(
        &client(),
        &url(&mock_server, "/slow"),
        Duration::from_millis(200),
    )
    .await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_check_link_falls_back_to_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let status = check_link(&client(), &url(&mock_server, "/no-head"), TIMEOUT).await;
    assert_eq!(status, LinkStatus::Reachable(200));
}

#[tokio::test]
async fn test_check_link_reports_missing_page() {
    let mock_server = MockServer::start().await;

    let status = check_link(&client(), &url(&mock_server, "/nothing"), TIMEOUT).await;
    assert!(matches!(
        status,
        LinkStatus::Broken {
            status: Some(404),
            ..
        }
    ));
}

#[tokio::test]
async fn test_check_link_unknown_host_is_broken() {
    let target = Url::parse("http://no-such-host.invalid/").unwrap();

    // Resolver failures can take a few seconds to surface
    match check_link(&client(), &target, Duration::from_secs(15)).await {
        LinkStatus::Broken { status, reason } => {
            assert_eq!(status, None);
            assert!(reason.is_some_and(|r| !r.is_empty()));
        }
        other => panic!("expected a broken link, got {:?}", other),
    }
}

#[tokio::test]
async fn test_check_link_refused_connection_is_broken() {
    let target = Url::parse("http://127.0.0.1:1/").unwrap();

    match check_link(&client(), &target, TIMEOUT).await {
        LinkStatus::Broken { status, reason } => {
            assert_eq!(status, None);
            let reason = reason.unwrap_or_default().to_lowercase();
            assert!(reason.contains("refused"), "unexpected reason: {}", reason);
        }
        other => panic!("expected a broken link, got {:?}", other),
    }
}

#[tokio::test]
async fn test_check_link_redirect_loop_is_broken() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&mock_server)
        .await;

    let status = check_link(&client(), &url(&mock_server, "/loop"), TIMEOUT).await;
    assert_eq!(
        status,
        LinkStatus::Broken {
            status: None,
            reason: Some("Too many redirects".to_string()),
        }
    );
}

#[tokio::test]
async fn test_check_link_timeout_is_inconclusive() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let status = check_link(
        &client(),
        &url(&mock_server, "/slow"),
        Duration::from_millis(200),
    )
    .await;
    assert_eq!(status, LinkStatus::Inconclusive("Request timeout".to_string()));
}

#[tokio::test]
async fn test_fetch_robots_missing_file_allows_all() {
    let mock_server = MockServer::start().await;

    let robots = fetch_robots(&client(), &url(&mock_server, "/page"), TIMEOUT).await;

    assert!(!robots.present);
    assert!(robots
        .content
        .is_allowed(&format!("{}/private", mock_server.uri()), "TestBot"));
}

#[tokio::test]
async fn test_fetch_robots_server_error_allows_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let robots = fetch_robots(&client(), &url(&mock_server, "/"), TIMEOUT).await;
    assert!(!robots.present);
    assert!(!robots
        .content
        .denies_agent(&format!("{}/", mock_server.uri()), "TestBot"));
}

#[tokio::test]
async fn test_crawl_delay_stretches_interval() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nCrawl-delay: 2\nDisallow: /private"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let politeness = PolitenessController::new(client(), "TestBot", TIMEOUT);
    let site = url(&mock_server, "/");

    assert!(politeness.check_robots_allowed(&site).await);
    assert_eq!(
        politeness
            .effective_interval(&site, Duration::from_millis(500))
            .await,
        Duration::from_secs(2)
    );
    assert_eq!(
        politeness
            .effective_interval(&site, Duration::from_secs(5))
            .await,
        Duration::from_secs(5)
    );
    assert!(politeness.robots_for(&site).await.present);
}
