//! Integration tests for Site-Harvest
//!
//! These tests use wiremock to serve small synthetic sites and exercise the
//! crawler, the extraction pipeline, and full harvest sessions end-to-end.

mod crawl_tests;
mod sitemap_tests;

use site_harvest::config::Config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Default configuration tuned for fast, deterministic tests
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.http.max_retries = 0;
    config.http.request_timeout_secs = 5;
    config.crawler.max_workers = 4;
    config.crawler.depth_limit = 2;
    config.user_agent.identity = "TestBot".to_string();
    config
}

/// Mounts an HTML page at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Mounts an HTML page at `route` that must be requested exactly `times` times
pub async fn mount_page_expecting(
    server: &MockServer,
    route: &str,
    body: impl Into<String>,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_robots(server: &MockServer, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into(), "text/plain"))
        .mount(server)
        .await;
}

pub async fn mount_xml(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into(), "application/xml"))
        .mount(server)
        .await;
}

pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

/// Wraps anchors to the given paths in a minimal page
pub fn page_with_links(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><nav>{}</nav><p>{} page.</p></body></html>",
        title, anchors, title
    )
}
