//! Integration tests for the socket fetcher
//!
//! These tests use wiremock to stand up local HTTP servers and exercise the
//! fetcher's status, content-type and redirect handling over real sockets.

use std::time::Duration;
use sumi_lens::crawler::{FetchError, WireFetcher};
use sumi_lens::SkipReason;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_fetcher() -> WireFetcher {
    WireFetcher::new("TestCrawler/1.0")
        .expect("Failed to build fetcher")
        .with_timeouts(Duration::from_secs(5), Duration::from_secs(5))
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

fn redirect(to: &str) -> ResponseTemplate {
    ResponseTemplate::new(301).insert_header("Location", to)
}

fn url_of(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).expect("Failed to parse mock URL")
}

#[tokio::test]
async fn test_fetch_html_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(query_param("q", "rust"))
        .and(header("user-agent", "TestCrawler/1.0"))
        .respond_with(html("<html>\r\n<body>Hello</body>\r\n</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = url_of(&mock_server, "/page?q=rust");
    let page = test_fetcher().fetch(&url, 3).await.expect("Fetch failed");

    assert_eq!(page.status, 200);
    assert_eq!(page.url, url);
    assert_eq!(page.final_url, url);
    assert_eq!(page.body, "<html>\n<body>Hello</body>\n</html>\n");
}

#[tokio::test]
async fn test_non_html_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"{}".to_vec(), "application/json"))
        .mount(&mock_server)
        .await;

    let err = test_fetcher()
        .fetch(&url_of(&mock_server, "/data.json"), 3)
        .await
        .unwrap_err();

    match &err {
        FetchError::NotHtml { content_type, .. } => assert_eq!(content_type, "application/json"),
        other => panic!("Expected NotHtml, got {:?}", other),
    }
    assert_eq!(err.skip_reason(), SkipReason::NotHtml);
}

#[tokio::test]
async fn test_error_status_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(b"<p>nope</p>".to_vec(), "text/html"))
        .mount(&mock_server)
        .await;

    let err = test_fetcher()
        .fetch(&url_of(&mock_server, "/gone"), 3)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::StatusRejected { status: 404, .. }));
}

#[tokio::test]
async fn test_redirect_without_location_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&mock_server)
        .await;

    let err = test_fetcher()
        .fetch(&url_of(&mock_server, "/moved"), 3)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::StatusRejected { status: 302, .. }));
}

#[tokio::test]
async fn test_follows_redirects_within_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r1"))
        .respond_with(redirect("/r2"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r2"))
        .respond_with(redirect(&format!("{}/r3", mock_server.uri())))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r3"))
        .respond_with(redirect("final"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(html("<p>arrived</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let start = url_of(&mock_server, "/r1");
    let page = test_fetcher().fetch(&start, 3).await.expect("Fetch failed");

    // the page is reported under the URL that was asked for
    assert_eq!(page.url, start);
    assert_eq!(page.final_url, url_of(&mock_server, "/final"));
    assert!(page.body.contains("arrived"));
}

#[tokio::test]
async fn test_redirect_budget_exhausted() {
    let mock_server = MockServer::start().await;

    for (from, to) in [("/a1", "/a2"), ("/a2", "/a3"), ("/a3", "/a4"), ("/a4", "/final")] {
        Mock::given(method("GET"))
            .and(path(from))
            .respond_with(redirect(to))
            .expect(1)
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(html("<p>never</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = test_fetcher()
        .fetch(&url_of(&mock_server, "/a1"), 3)
        .await
        .unwrap_err();

    match &err {
        FetchError::RedirectExhausted(at) => assert!(at.ends_with("/a4")),
        other => panic!("Expected RedirectExhausted, got {:?}", other),
    }
    assert_eq!(err.skip_reason(), SkipReason::RedirectExhausted);
}

#[tokio::test]
async fn test_zero_redirect_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(redirect("/next"))
        .mount(&mock_server)
        .await;

    let err = test_fetcher()
        .fetch(&url_of(&mock_server, "/start"), 0)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::RedirectExhausted(_)));
}

#[tokio::test]
async fn test_redirect_to_unsupported_scheme() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/out"))
        .respond_with(redirect("ftp://files.example.com/pub"))
        .mount(&mock_server)
        .await;

    let err = test_fetcher()
        .fetch(&url_of(&mock_server, "/out"), 3)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::InvalidScheme(_)));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late</p>").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher().with_timeouts(Duration::from_secs(5), Duration::from_millis(200));
    let err = fetcher
        .fetch(&url_of(&mock_server, "/slow"), 3)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Timeout(_)));
    assert_eq!(err.skip_reason(), SkipReason::Timeout);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local address").port();
    drop(listener);

    let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
    let err = test_fetcher().fetch(&url, 3).await.unwrap_err();

    assert_eq!(err.skip_reason(), SkipReason::NetworkError);
}

#[tokio::test]
async fn test_oversized_body_is_malformed() {
    let mock_server = MockServer::start().await;

    let body = format!("<p>{}</p>", "word ".repeat(100));
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(html(&body))
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher().with_max_body_bytes(64);
    let err = fetcher
        .fetch(&url_of(&mock_server, "/big"), 3)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::MalformedResponse { .. }));
    assert_eq!(err.skip_reason(), SkipReason::MalformedResponse);

    let page = test_fetcher()
        .fetch(&url_of(&mock_server, "/big"), 3)
        .await
        .expect("Fetch failed");
    assert!(page.body.starts_with("<p>word"));
}
