//! Crawler behavior against mock sites

use crate::{mount_page, mount_page_expecting, mount_robots, mount_xml, page_with_links, test_config};
use site_harvest::crawler::{CrawlSource, Crawler, HttpFetcher, SessionGuard};
use site_harvest::robots::{RobotsCache, MAX_CRAWL_DELAY};
use site_harvest::url::AllowAll;
use site_harvest::{Config, HarvestError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crawler(config: &Config, guard: SessionGuard) -> Crawler {
    let fetcher = HttpFetcher::from_config(config).expect("Failed to build HTTP client");
    Crawler::new(config, fetcher, guard)
}

fn seed(server: &MockServer) -> Url {
    Url::parse(&server.uri()).expect("Failed to parse mock server URI")
}

fn url(server: &MockServer, route: &str) -> String {
    format!("{}{}", server.uri(), route)
}

#[tokio::test]
async fn test_each_url_claimed_once_under_concurrency() {
    let mock_server = MockServer::start().await;

    // Every page links to every other page plus a shared target
    let all = ["/a", "/b", "/c", "/d", "/shared"];
    mount_page_expecting(&mock_server, "/", page_with_links("Home", &all), 1).await;
    for route in all {
        mount_page_expecting(&mock_server, route, page_with_links(route, &all), 1).await;
    }

    let mut config = test_config();
    config.crawler.max_workers = 8;
    config.crawler.depth_limit = 3;

    let outcome = crawler(&config, SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.source, CrawlSource::LinkCrawl);
    assert_eq!(outcome.urls.len(), 6);
    for route in all {
        assert!(outcome.urls.contains(&url(&mock_server, route)));
    }
    // Request counts are verified by the mocks on drop
}

#[tokio::test]
async fn test_depth_limit_truncates_chain() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", page_with_links("Home", &["/1"])).await;
    mount_page(&mock_server, "/1", page_with_links("One", &["/2"])).await;
    mount_page(&mock_server, "/2", page_with_links("Two", &["/3"])).await;
    mount_page_expecting(&mock_server, "/3", page_with_links("Three", &["/4"]), 0).await;
    mount_page_expecting(&mock_server, "/4", page_with_links("Four", &[]), 0).await;

    let mut config = test_config();
    config.crawler.depth_limit = 2;

    let outcome = crawler(&config, SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.urls.len(), 3);
    assert!(outcome.urls.contains(&url(&mock_server, "/")));
    assert!(outcome.urls.contains(&url(&mock_server, "/1")));
    assert!(outcome.urls.contains(&url(&mock_server, "/2")));
    assert!(!outcome.urls.contains(&url(&mock_server, "/3")));
}

#[tokio::test]
async fn test_sitemap_short_circuits_link_crawl() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_robots(
        &mock_server,
        format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n", base),
    )
    .await;
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/about</loc></url>
  <url><loc>{base}/news?page=2</loc></url>
</urlset>"#
        ),
    )
    .await;

    // The seed links elsewhere; it must never be fetched
    mount_page_expecting(&mock_server, "/", page_with_links("Home", &["/careers"]), 0).await;
    mount_page_expecting(&mock_server, "/careers", page_with_links("Careers", &[]), 0).await;

    let outcome = crawler(&test_config(), SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.source, CrawlSource::Sitemap);
    assert_eq!(outcome.urls.len(), 2);
    assert!(outcome.urls.contains(&url(&mock_server, "/about")));
    assert!(outcome.urls.contains(&url(&mock_server, "/news")));
}

#[tokio::test]
async fn test_empty_filtered_sitemap_falls_back_to_links() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_robots(&mock_server, format!("Sitemap: {}/sitemap.xml\n", base)).await;
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        format!(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/products/widget</loc></url>
</urlset>"#
        ),
    )
    .await;
    mount_page(&mock_server, "/", page_with_links("Home", &["/about"])).await;
    mount_page(&mock_server, "/about", page_with_links("About", &[])).await;

    let filter = |u: &str| u.contains("about");
    let outcome = crawler(&test_config(), SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(filter))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.source, CrawlSource::LinkCrawl);
    assert!(outcome.urls.contains(&url(&mock_server, "/about")));
}

#[tokio::test]
async fn test_robots_disallowed_pages_not_fetched() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(
        &mock_server,
        "/",
        page_with_links("Home", &["/private/payroll", "/public"]),
    )
    .await;
    mount_page_expecting(&mock_server, "/private/payroll", page_with_links("Secret", &[]), 0).await;
    mount_page_expecting(&mock_server, "/public", page_with_links("Public", &[]), 1).await;

    let outcome = crawler(&test_config(), SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert!(outcome.urls.contains(&url(&mock_server, "/public")));
}

#[tokio::test]
async fn test_impolite_crawl_ignores_robots() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, "User-agent: *\nDisallow: /\n").await;
    mount_page(&mock_server, "/", page_with_links("Home", &["/team"])).await;
    mount_page_expecting(&mock_server, "/team", page_with_links("Team", &[]), 1).await;

    let mut config = test_config();
    config.crawler.politeness = false;

    let outcome = crawler(&config, SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert!(outcome.urls.contains(&url(&mock_server, "/team")));
}

#[tokio::test]
async fn test_robots_fetched_once_per_domain() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("User-agent: *\nAllow: /\n", "text/plain"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pages = ["/a", "/b", "/c"];
    mount_page(&mock_server, "/", page_with_links("Home", &pages)).await;
    for route in pages {
        mount_page(&mock_server, route, page_with_links(route, &pages)).await;
    }

    let crawler = crawler(&test_config(), SessionGuard::new());
    crawler
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert_eq!(crawler.robots().len(), 1);
}

#[tokio::test]
async fn test_missing_robots_is_cached_as_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", page_with_links("Home", &["/a", "/b"])).await;
    mount_page(&mock_server, "/a", page_with_links("A", &[])).await;
    mount_page(&mock_server, "/b", page_with_links("B", &[])).await;

    let outcome = crawler(&test_config(), SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.urls.len(), 3);
}

#[tokio::test]
async fn test_failed_branch_does_not_stop_siblings() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", page_with_links("Home", &["/broken", "/working"])).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/working", page_with_links("Working", &["/deeper"])).await;
    mount_page(&mock_server, "/deeper", page_with_links("Deeper", &[])).await;

    let outcome = crawler(&test_config(), SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert!(outcome.urls.contains(&url(&mock_server, "/working")));
    assert!(outcome.urls.contains(&url(&mock_server, "/deeper")));
}

#[tokio::test]
async fn test_non_html_pages_contribute_no_links() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", page_with_links("Home", &["/feed"])).await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"href": "/hidden"}"#, "application/json"))
        .mount(&mock_server)
        .await;
    mount_page_expecting(&mock_server, "/hidden", page_with_links("Hidden", &[]), 0).await;

    let outcome = crawler(&test_config(), SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert!(outcome.urls.contains(&url(&mock_server, "/feed")));
    assert_eq!(outcome.urls.len(), 2);
}

#[tokio::test]
async fn test_unreachable_seed_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = crawler(&test_config(), SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await;

    assert!(matches!(result, Err(HarvestError::SeedUnreachable { .. })));
}

#[tokio::test]
async fn test_aborted_session_stops_after_seed() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", page_with_links("Home", &["/a"])).await;
    mount_page_expecting(&mock_server, "/a", page_with_links("A", &[]), 0).await;

    let guard = SessionGuard::new();
    guard.abort();

    let outcome = crawler(&test_config(), guard)
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.urls.len(), 1);
    assert!(outcome.urls.contains(&url(&mock_server, "/")));
}

async fn mount_delayed_site(server: &MockServer) {
    mount_robots(server, "User-agent: *\nCrawl-delay: 1\n").await;
    mount_page(server, "/", page_with_links("Home", &["/about"])).await;
    mount_page(server, "/about", page_with_links("About", &[])).await;
}

#[tokio::test]
async fn test_polite_crawl_honors_crawl_delay() {
    let mock_server = MockServer::start().await;
    mount_delayed_site(&mock_server).await;

    let mut config = test_config();
    config.crawler.depth_limit = 1;

    let start = Instant::now();
    let outcome = crawler(&config, SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.urls.len(), 2);
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_impolite_crawl_skips_crawl_delay() {
    let mock_server = MockServer::start().await;
    mount_delayed_site(&mock_server).await;

    let mut config = test_config();
    config.crawler.depth_limit = 1;
    config.crawler.politeness = false;

    let start = Instant::now();
    let outcome = crawler(&config, SessionGuard::new())
        .start(&seed(&mock_server), Arc::new(AllowAll))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.urls.len(), 2);
    assert!(start.elapsed() < Duration::from_millis(900));
}

#[tokio::test]
async fn test_oversized_crawl_delay_is_clamped() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nCrawl-delay: 1e300\n").await;

    let fetcher = HttpFetcher::from_config(&test_config()).expect("Failed to build HTTP client");
    let robots = RobotsCache::new(fetcher, "TestBot");

    let delay = robots.crawl_delay(&seed(&mock_server)).await;
    assert_eq!(delay, Some(MAX_CRAWL_DELAY));
}
