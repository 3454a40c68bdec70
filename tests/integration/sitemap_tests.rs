//! Sitemap resolution against mock sites

use crate::{mount_xml, test_config};
use site_harvest::config::SitemapStrategy;
use site_harvest::crawler::HttpFetcher;
use site_harvest::sitemap::SitemapResolver;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver(strategy: SitemapStrategy) -> SitemapResolver {
    let fetcher = HttpFetcher::from_config(&test_config()).expect("Failed to build HTTP client");
    SitemapResolver::new(fetcher, "TestBot", strategy)
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

async fn mount_nested_site(server: &MockServer) {
    let base = server.uri();
    mount_xml(
        server,
        "/sitemap.xml",
        index(&[format!("{base}/sitemap-pages.xml"), format!("{base}/sitemap-news.xml")]),
    )
    .await;
    mount_xml(
        server,
        "/sitemap-pages.xml",
        urlset(&[format!("{base}/about"), format!("{base}/contact")]),
    )
    .await;
}

#[tokio::test]
async fn test_index_follows_first_nested_only() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_nested_site(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/sitemap-news.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(urlset(&[format!("{base}/news")]), "application/xml"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let urls = resolver(SitemapStrategy::FirstNested)
        .resolve(&format!("{base}/sitemap.xml"))
        .await
        .expect("Sitemap should resolve");

    assert_eq!(urls, vec![format!("{base}/about"), format!("{base}/contact")]);
}

#[tokio::test]
async fn test_index_all_nested_merges_in_order() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_nested_site(&mock_server).await;
    mount_xml(&mock_server, "/sitemap-news.xml", urlset(&[format!("{base}/news")])).await;

    let urls = resolver(SitemapStrategy::AllNested)
        .resolve(&format!("{base}/sitemap.xml"))
        .await
        .expect("Sitemap should resolve");

    assert_eq!(
        urls,
        vec![
            format!("{base}/about"),
            format!("{base}/contact"),
            format!("{base}/news"),
        ]
    );
}

#[tokio::test]
async fn test_self_referencing_index_terminates() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_xml(&mock_server, "/sitemap.xml", index(&[format!("{base}/sitemap.xml")])).await;

    let result = resolver(SitemapStrategy::AllNested)
        .resolve(&format!("{base}/sitemap.xml"))
        .await;

    assert!(result.is_none());
}

#[tokio::test]
async fn test_unusable_sitemaps_resolve_to_none() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_xml(&mock_server, "/malformed.xml", "<urlset><url><loc>unterminated").await;
    mount_xml(&mock_server, "/empty.xml", urlset(&[])).await;

    let resolver = resolver(SitemapStrategy::FirstNested);
    assert!(resolver.resolve(&format!("{base}/malformed.xml")).await.is_none());
    assert!(resolver.resolve(&format!("{base}/empty.xml")).await.is_none());
    assert!(resolver.resolve(&format!("{base}/missing.xml")).await.is_none());
}
