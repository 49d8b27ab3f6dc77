//! Integration tests for sitemap discovery
//!
//! These tests use wiremock to serve sitemap trees over HTTP and run the
//! full discovery cycle into a temporary SQLite database.

use docs_discovery::config::{Config, FetcherConfig, OutputConfig};
use docs_discovery::discovery::{FetchContent, HttpFetcher};
use docs_discovery::runner;
use docs_discovery::storage::{open_storage, QueueStatus, QueueStorage, RunStatus, RunStorage};
use docs_discovery::{DiscoveryError, DocType, FetchError, SourceConfig, SourceId};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with one source rooted on the mock server
fn create_test_config(source: &str, sitemap_url: String, db_dir: &TempDir) -> Config {
    Config {
        fetcher: FetcherConfig {
            timeout_secs: 5,
            ..FetcherConfig::default()
        },
        output: OutputConfig {
            database_path: db_dir
                .path()
                .join("discovery.db")
                .to_string_lossy()
                .into_owned(),
        },
        sources: vec![SourceConfig::new(source, sitemap_url)],
    }
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_http_fetcher_returns_body_and_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header("user-agent", "JFBDocsBot/0.1 (+sitemap-discovery)"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();
    let body = fetcher
        .fetch(&format!("{}/sitemap.xml", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, b"<urlset/>".to_vec());
}

#[tokio::test]
async fn test_http_fetcher_non_success_status_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();
    let result = fetcher
        .fetch(&format!("{}/missing.xml", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_http_fetcher_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<urlset/>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        timeout_secs: 1,
        ..FetcherConfig::default()
    };
    let fetcher = HttpFetcher::new(&config).unwrap();
    let result = fetcher
        .fetch(&format!("{}/slow.xml", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_full_discovery_into_database() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{0}/post-sitemap.xml</loc></sitemap>
  <sitemap><loc>{0}/kb-sitemap.xml.gz</loc></sitemap>
  <sitemap><loc>{0}/sitemap_index.xml</loc></sitemap>
</sitemapindex>"#,
            base_url
        ),
    )
    .await;

    mount_xml(
        &mock_server,
        "/post-sitemap.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/blog/launch/?utm_source=feed</loc></url>
  <url><loc>{0}/blog/launch</loc></url>
  <url><loc>{0}/docs/api/#auth</loc></url>
</urlset>"#,
            base_url
        ),
    )
    .await;

    let kb_sitemap = format!(
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/kb/setup/</loc></url>
  <url><loc>{0}/about</loc></url>
</urlset>"#,
        base_url
    );
    Mock::given(method("GET"))
        .and(path("/kb-sitemap.xml.gz"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(gzip(kb_sitemap.as_bytes()))
                .insert_header("content-type", "application/x-gzip"),
        )
        .mount(&mock_server)
        .await;

    let db_dir = TempDir::new().unwrap();
    let config = create_test_config(
        "crocoblock",
        format!("{}/sitemap_index.xml", base_url),
        &db_dir,
    );

    let summary = runner::run(&config).await.unwrap();
    assert_eq!(summary.candidate_count, 4);
    assert_eq!(summary.processed_count, 4);

    // The mock host belongs to no known source, so the declared one is used
    let counts: Vec<(SourceId, DocType, u64)> = summary
        .counts_by_source_type
        .iter()
        .map(|c| (c.source, c.doc_type, c.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            (SourceId::Crocoblock, DocType::Blog, 1),
            (SourceId::Crocoblock, DocType::Docs, 1),
            (SourceId::Crocoblock, DocType::Kb, 1),
            (SourceId::Crocoblock, DocType::Unknown, 1),
        ]
    );

    let storage = open_storage(db_dir.path().join("discovery.db").as_path()).unwrap();
    let pending = storage.list_pending(100).unwrap();
    let mut urls: Vec<String> = pending.iter().map(|e| e.url.clone()).collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            format!("{}/about", base_url),
            format!("{}/blog/launch", base_url),
            format!("{}/docs/api", base_url),
            format!("{}/kb/setup", base_url),
        ]
    );
    assert!(pending.iter().all(|e| e.status == QueueStatus::Pending));

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.candidate_count, Some(4));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        format!(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/tutorials/first</loc></url>
  <url><loc>{0}/tutorials/second</loc></url>
</urlset>"#,
            base_url
        ),
    )
    .await;

    let db_dir = TempDir::new().unwrap();
    let config = create_test_config(
        "jetformbuilder",
        format!("{}/sitemap.xml", base_url),
        &db_dir,
    );

    let first = runner::run(&config).await.unwrap();
    let first_seen = {
        let storage = open_storage(db_dir.path().join("discovery.db").as_path()).unwrap();
        storage
            .get_queue_entry(&format!("{}/tutorials/first", base_url))
            .unwrap()
            .unwrap()
    };

    let second = runner::run(&config).await.unwrap();
    assert_eq!(first.counts_by_source_type, second.counts_by_source_type);
    assert_eq!(second.processed_count, 2);

    let storage = open_storage(db_dir.path().join("discovery.db").as_path()).unwrap();
    let entry = storage
        .get_queue_entry(&format!("{}/tutorials/first", base_url))
        .unwrap()
        .unwrap();
    assert_eq!(entry.id, first_seen.id);
    assert_eq!(entry.discovered_at, first_seen.discovered_at);
    assert!(entry.last_seen_at >= first_seen.last_seen_at);
    assert_eq!(entry.doc_type, DocType::Tutorial);
    assert_eq!(storage.list_pending(100).unwrap().len(), 2);
}

#[tokio::test]
async fn test_unavailable_sitemap_fails_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let db_dir = TempDir::new().unwrap();
    let config = create_test_config(
        "jetformbuilder",
        format!("{}/sitemap_index.xml", mock_server.uri()),
        &db_dir,
    );

    let error = runner::run(&config).await.unwrap_err();
    assert!(matches!(
        error,
        DiscoveryError::Fetch(FetchError::Status { status: 503, .. })
    ));
    assert_eq!(error.kind(), "fetch_error");

    let storage = open_storage(db_dir.path().join("discovery.db").as_path()).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert!(storage.list_pending(10).unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_sitemap_fails_run() {
    let mock_server = MockServer::start().await;

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        "<urlset><url><loc>unterminated".to_string(),
    )
    .await;

    let db_dir = TempDir::new().unwrap();
    let config = create_test_config(
        "crocoblock",
        format!("{}/sitemap_index.xml", mock_server.uri()),
        &db_dir,
    );

    let error = runner::run(&config).await.unwrap_err();
    assert_eq!(error.kind(), "parse_error");
}
