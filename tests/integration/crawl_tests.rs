//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::collections::BTreeSet;
use std::time::Duration;
use sumi_lens::config::{CrawlerConfig, TraversalOrder};
use sumi_lens::crawler::{Coordinator, WireFetcher};
use sumi_lens::{InvertedIndex, SkipReason};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler configuration for a test
fn create_test_config(max_pages: usize, workers: usize, traversal: TraversalOrder) -> CrawlerConfig {
    CrawlerConfig {
        max_pages,
        max_concurrent_fetches: workers,
        traversal,
        ..CrawlerConfig::default()
    }
}

fn create_coordinator(config: &CrawlerConfig) -> Coordinator {
    let fetcher = WireFetcher::new("TestBot/1.0")
        .expect("Failed to build fetcher")
        .with_timeouts(Duration::from_secs(5), Duration::from_secs(5));
    Coordinator::new(fetcher, config)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html")
}

/// Mounts an HTML page at `route` that links to each of `links`
async fn mount_page(server: &MockServer, route: &str, text: &str, links: &[&str]) {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a> "#, link))
        .collect();
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(format!(
            "<html><head><title>{}</title></head><body><p>{}</p> {}</body></html>",
            route, text, anchors
        )))
        .mount(server)
        .await;
}

fn seed(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).expect("Failed to parse seed")
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("Request recording disabled")
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", "welcome home", &["/page1", "/page2"]).await;
    mount_page(&mock_server, "/page1", "first content", &["/"]).await;
    mount_page(&mock_server, "/page2", "second content", &[]).await;

    let coordinator = create_coordinator(&create_test_config(10, 1, TraversalOrder::DepthFirst));
    let mut index = InvertedIndex::new();
    let stats = coordinator.crawl(seed(&mock_server, "/"), &mut index).await;

    assert_eq!(stats.indexed, 3);
    assert_eq!(stats.dispatched, 3);
    assert_eq!(stats.skip_count(SkipReason::AlreadyVisited), 1);
    assert_eq!(index.num_locations(), 3);

    let home = format!("{}/", mock_server.uri());
    assert!(index.has_word_at("welcom", &home));
    assert_eq!(index.num_locations_of("content"), 2);
    // title text sits in <head> and is never indexed
    assert!(!index.has_word("page"));
}

#[tokio::test]
async fn test_budget_limits_deep_chain() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/p1", "one", &["/p2"]).await;
    mount_page(&mock_server, "/p2", "two", &["/p3"]).await;
    for (route, next) in [("/p3", "/p4"), ("/p4", "/p5"), ("/p5", "/p1")] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html(format!(r#"<a href="{}">next</a>"#, next)))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let coordinator = create_coordinator(&create_test_config(2, 1, TraversalOrder::DepthFirst));
    let mut index = InvertedIndex::new();
    let stats = coordinator.crawl(seed(&mock_server, "/p1"), &mut index).await;

    assert_eq!(stats.indexed, 2);
    assert_eq!(stats.dispatched, 2);
    assert_eq!(index.num_locations(), 2);
    assert_eq!(stats.skip_count(SkipReason::BudgetExhausted), 1);
    assert_eq!(requested_paths(&mock_server).await, vec!["/p1", "/p2"]);
}

#[tokio::test]
async fn test_budget_holds_with_concurrent_fetches() {
    let mock_server = MockServer::start().await;

    let routes: Vec<String> = (0..10).map(|i| format!("/leaf{}", i)).collect();
    let links: Vec<&str> = routes.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/", "hub", &links).await;
    for route in &routes {
        mount_page(&mock_server, route, "leaf", &[]).await;
    }

    let coordinator = create_coordinator(&create_test_config(4, 4, TraversalOrder::BreadthFirst));
    let mut index = InvertedIndex::new();
    let stats = coordinator.crawl(seed(&mock_server, "/"), &mut index).await;

    assert_eq!(stats.indexed, 4);
    assert_eq!(index.num_locations(), 4);
    assert_eq!(requested_paths(&mock_server).await.len(), 4);
}

#[tokio::test]
async fn test_fragments_collapse_to_one_location() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", "start", &["/doc#intro", "/doc#usage", "/doc", "#top"]).await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(html("<p>documentation</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator = create_coordinator(&create_test_config(10, 1, TraversalOrder::DepthFirst));
    let mut index = InvertedIndex::new();
    let stats = coordinator.crawl(seed(&mock_server, "/#main"), &mut index).await;

    let locations: Vec<String> = index.counts().keys().cloned().collect();
    assert_eq!(
        locations,
        vec![
            format!("{}/", mock_server.uri()),
            format!("{}/doc", mock_server.uri()),
        ]
    );
    assert_eq!(stats.indexed, 2);
    assert_eq!(stats.skip_count(SkipReason::AlreadyVisited), 3);
}

#[tokio::test]
async fn test_bad_links_are_skipped_not_fatal() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        "hub",
        &["http://[broken", "mailto:someone@example.com", "/missing", "/data", "/good"],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"a,b,c".to_vec(), "text/csv"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/good", "fine page", &[]).await;

    let coordinator = create_coordinator(&create_test_config(10, 2, TraversalOrder::DepthFirst));
    let mut index = InvertedIndex::new();
    let stats = coordinator.crawl(seed(&mock_server, "/"), &mut index).await;

    assert_eq!(stats.indexed, 2);
    assert_eq!(stats.dispatched, 4);
    assert_eq!(stats.skip_count(SkipReason::MalformedLink), 1);
    assert_eq!(stats.skip_count(SkipReason::InvalidScheme), 1);
    assert_eq!(stats.skip_count(SkipReason::StatusRejected), 1);
    assert_eq!(stats.skip_count(SkipReason::NotHtml), 1);
    assert!(index.has_word("fine"));
}

#[tokio::test]
async fn test_traversal_orders() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", "root", &["/a", "/b"]).await;
    mount_page(&mock_server, "/a", "a", &["/a1"]).await;
    mount_page(&mock_server, "/b", "b", &[]).await;
    mount_page(&mock_server, "/a1", "a1", &[]).await;

    let depth_first = create_coordinator(&create_test_config(10, 1, TraversalOrder::DepthFirst));
    depth_first
        .crawl(seed(&mock_server, "/"), &mut InvertedIndex::new())
        .await;
    assert_eq!(requested_paths(&mock_server).await, vec!["/", "/a", "/a1", "/b"]);

    mock_server.reset().await;
    mount_page(&mock_server, "/", "root", &["/a", "/b"]).await;
    mount_page(&mock_server, "/a", "a", &["/a1"]).await;
    mount_page(&mock_server, "/b", "b", &[]).await;
    mount_page(&mock_server, "/a1", "a1", &[]).await;

    let breadth_first = create_coordinator(&create_test_config(10, 1, TraversalOrder::BreadthFirst));
    breadth_first
        .crawl(seed(&mock_server, "/"), &mut InvertedIndex::new())
        .await;
    assert_eq!(requested_paths(&mock_server).await, vec!["/", "/a", "/b", "/a1"]);
}

#[tokio::test]
async fn test_search_over_crawled_pages() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", "rust crawler", &["/deep"]).await;
    mount_page(&mock_server, "/deep", "rust rust rust and many more words sit here today", &[]).await;

    let coordinator = create_coordinator(&create_test_config(10, 1, TraversalOrder::DepthFirst));
    let mut index = InvertedIndex::new();
    coordinator.crawl(seed(&mock_server, "/"), &mut index).await;

    let terms: BTreeSet<String> = ["rust".to_string()].into_iter().collect();
    let results = index.exact_search(&terms);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].location(), format!("{}/", mock_server.uri()));
    assert_eq!(results[0].matches(), 1);
    assert_eq!(results[1].matches(), 3);
    assert!(results[0].score() > results[1].score());
}
