//! End-to-end crawl tests against a local mock server

use docsweep::events::CrawlEvent;
use docsweep::{Config, Crawler, EventSink, VerifyMethod};
use std::sync::atomic::Ordering;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config tuned for tests: no delays, no robots, no catch-all rule
fn test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.polite_delay_ms = 0;
    config.crawler.respect_robots = false;
    config.crawler.timeout_secs = 5;
    config.classifier.enable_fallback = false;
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

#[tokio::test]
async fn crawl_discovers_and_verifies_documents_without_downloading_them() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"
            <a href="/files/a.pdf">Report A</a>
            <a href="/files/b.pdf">Report B</a>
            <a href="/about">go</a>
            "#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page("<p>nothing to see</p>"))
        .mount(&server)
        .await;

    // Extension matches must be verified with zero requests
    Mock::given(path("/files/a.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(path("/files/b.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut crawler = Crawler::new(test_config(1)).unwrap();
    let report = crawler.crawl(&server.uri()).await.unwrap();

    assert_eq!(report.counters.pages_crawled, 2);
    assert_eq!(report.counters.candidates_seen, 2);
    assert_eq!(report.counters.verified_count, 2);
    assert!(!report.stopped);
    assert!(report
        .verified
        .iter()
        .all(|d| d.method == VerifyMethod::ExtensionMatch));
}

#[tokio::test]
async fn depth_limit_keeps_deeper_pages_unfetched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/level1">go</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html_page(r#"<a href="/level2">go</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html_page("deep"))
        .expect(0)
        .mount(&server)
        .await;

    let mut crawler = Crawler::new(test_config(1)).unwrap();
    let report = crawler.crawl(&server.uri()).await.unwrap();

    assert_eq!(report.counters.pages_crawled, 2);
}

#[tokio::test]
async fn page_cap_stops_the_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/p1">go</a><a href="/p2">go</a><a href="/p3">go</a>"#,
        ))
        .mount(&server)
        .await;
    for p in ["/p1", "/p2", "/p3"] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(html_page("leaf"))
            .mount(&server)
            .await;
    }

    let mut config = test_config(3);
    config.crawler.max_pages = 2;
    let mut crawler = Crawler::new(config).unwrap();
    let report = crawler.crawl(&server.uri()).await.unwrap();

    assert_eq!(report.counters.pages_crawled, 2);
}

#[tokio::test]
async fn stop_flag_halts_before_any_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("never served"))
        .expect(0)
        .mount(&server)
        .await;

    let mut crawler = Crawler::new(test_config(1)).unwrap();
    crawler.stop_handle().store(true, Ordering::Relaxed);
    let report = crawler.crawl(&server.uri()).await.unwrap();

    assert!(report.stopped);
    assert_eq!(report.counters.pages_crawled, 0);
}

#[tokio::test]
async fn stop_after_first_page_crawls_exactly_one() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/p1">go</a><a href="/p2">go</a><a href="/p3">go</a>"#,
        ))
        .mount(&server)
        .await;
    for p in ["/p1", "/p2", "/p3"] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(html_page("leaf"))
            .expect(0)
            .mount(&server)
            .await;
    }

    // The polite delay gives the watcher a chance to run between pages
    let mut config = test_config(3);
    config.crawler.polite_delay_ms = 200;

    let (sink, mut rx) = EventSink::channel();
    let mut crawler = Crawler::new(config).unwrap().with_events(sink);
    let stop = crawler.stop_handle();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if matches!(event, CrawlEvent::PageFetched { .. }) {
                stop.store(true, Ordering::Relaxed);
                break;
            }
        }
    });

    let report = crawler.crawl(&server.uri()).await.unwrap();

    assert!(report.stopped);
    assert_eq!(report.counters.pages_crawled, 1);
}

#[tokio::test]
async fn repeated_sightings_merge_into_one_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/files/manual.pdf">click</a><a href="/page2">go</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page(r#"<a href="/files/manual.pdf">PDF version</a>"#))
        .mount(&server)
        .await;

    let mut crawler = Crawler::new(test_config(1)).unwrap();
    let report = crawler.crawl(&server.uri()).await.unwrap();

    assert_eq!(report.counters.candidates_seen, 1);
    let candidate = &report.candidates[0];
    assert!(candidate.url.as_str().ends_with("/files/manual.pdf"));
    assert_eq!(candidate.found_on.len(), 2);
    // Second sighting added the text-hint reason on top of the extension
    assert!(candidate.reasons.len() >= 2);
}

#[tokio::test]
async fn robots_disallow_is_honored() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/private/page">go</a><a href="/public/page">go</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public/page"))
        .respond_with(html_page("ok"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(html_page("secret"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(1);
    config.crawler.respect_robots = true;
    let mut crawler = Crawler::new(config).unwrap();
    let report = crawler.crawl(&server.uri()).await.unwrap();

    assert_eq!(report.counters.pages_crawled, 2);
}

#[tokio::test]
async fn off_site_links_are_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="https://elsewhere.invalid/page">go</a>"#,
        ))
        .mount(&server)
        .await;

    let mut crawler = Crawler::new(test_config(2)).unwrap();
    let report = crawler.crawl(&server.uri()).await.unwrap();

    // Only the seed page; the off-site link is neither fetched nor a candidate
    assert_eq!(report.counters.pages_crawled, 1);
    assert_eq!(report.counters.candidates_seen, 0);
}

#[tokio::test]
async fn non_html_seed_is_still_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/downloads/annual-report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-1.5 body".to_vec()),
        )
        .mount(&server)
        .await;

    let seed = format!("{}/downloads/annual-report.pdf", server.uri());
    let mut crawler = Crawler::new(test_config(1)).unwrap();
    let report = crawler.crawl(&seed).await.unwrap();

    assert_eq!(report.counters.pages_crawled, 1);
    assert_eq!(report.counters.candidates_seen, 1);
    assert_eq!(report.counters.verified_count, 1);
}

#[tokio::test]
async fn events_track_the_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/guide.pdf">Guide</a>"#))
        .mount(&server)
        .await;

    let (sink, mut rx) = EventSink::channel();
    let mut crawler = Crawler::new(test_config(0)).unwrap().with_events(sink);
    let report = crawler.crawl(&server.uri()).await.unwrap();
    drop(crawler);

    assert_eq!(report.counters.verified_count, 1);

    let mut saw_fetched = false;
    let mut saw_found = false;
    let mut saw_verified = false;
    let mut saw_completed = false;
    while let Some(event) = rx.recv().await {
        match event {
            CrawlEvent::PageFetched { depth, .. } => {
                assert_eq!(depth, 0);
                saw_fetched = true;
            }
            CrawlEvent::CandidateFound { url, .. } => {
                assert!(url.ends_with("/guide.pdf"));
                saw_found = true;
            }
            CrawlEvent::CandidateVerified { method, .. } => {
                assert_eq!(method, VerifyMethod::ExtensionMatch);
                saw_verified = true;
            }
            CrawlEvent::Completed { counters } => {
                assert_eq!(counters.pages_crawled, 1);
                saw_completed = true;
            }
            _ => {}
        }
    }

    assert!(saw_fetched && saw_found && saw_verified && saw_completed);
}
