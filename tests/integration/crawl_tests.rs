//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end: frontier, robots.txt, link harvesting and the
//! extraction pool.

use objcrawler::config::{
    Config, CrawlerConfig, ExtractionConfig, SeedEntry, StorageConfig, UserAgentConfig,
};
use objcrawler::crawler::{run_crawl, Coordinator};
use objcrawler::download::model_file_name;
use objcrawler::seed::Seed;
use objcrawler::storage::{SqliteStorage, Storage};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &TempDir, seeds: Vec<SeedEntry>) -> Config {
    Config {
        crawler: CrawlerConfig {
            crawler_workers: 3,
            extraction_workers: 2,
            robots_cache_capacity: 16,
            request_timeout_secs: Some(10),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        storage: StorageConfig {
            database_path: dir.path().join("frontier.db").display().to_string(),
        },
        extraction: ExtractionConfig {
            output_folder: dir.path().join("models").display().to_string(),
            max_archive_bytes: 30000,
        },
        seeds,
    }
}

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

async fn mount(server: &MockServer, route: &str, body: impl Into<Vec<u8>>, content_type: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into(), content_type))
        .mount(server)
        .await;
}

/// A small site with pages, archives, a raw model and a robots.txt rule
async fn model_site() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"))
        .mount(&server)
        .await;

    mount(
        &server,
        "/",
        r##"<html><body>
            <a href="/models.html">Models</a>
            <a href="/chair.zip">Chair</a>
            <a href="/raw/table.blend">Table</a>
            <a href="/private/secret.zip">Secret</a>
            <a href="#top">Top</a>
        </body></html>"##,
        "text/html",
    )
    .await;

    mount(
        &server,
        "/models.html",
        r#"<html><body>
            <a href="/">Home</a>
            <a href="/chair.zip">Chair again</a>
            <a href="/big.zip">Huge</a>
            <a href="/notes.txt">Notes</a>
            <a href="/logo.png">Logo</a>
        </body></html>"#,
        "text/html; charset=utf-8",
    )
    .await;

    mount(
        &server,
        "/chair.zip",
        build_zip(&[
            ("chair.blend", b"BLENDER-v280 chair"),
            ("textures/oak.png", b"png"),
            ("README.txt", b"cc-by"),
        ]),
        "application/zip",
    )
    .await;

    mount(&server, "/raw/table.blend", "BLENDER-v300 table", "text/plain").await;
    mount(&server, "/big.zip", vec![0u8; 40000], "application/zip").await;
    mount(&server, "/notes.txt", "just some notes", "text/plain").await;
    mount(&server, "/logo.png", vec![0u8; 16], "image/png").await;

    Mock::given(method("GET"))
        .and(path("/private/secret.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 8], "application/zip"))
        .expect(0)
        .mount(&server)
        .await;

    server
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        if entry.path().is_dir() {
            found.extend(files_in(&entry.path()));
        } else {
            found.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    found.sort();
    found
}

#[tokio::test]
async fn test_full_crawl_extracts_models() {
    let server = model_site().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![]);

    let coordinator = Coordinator::new(config).unwrap();
    coordinator
        .seed(&[Seed::new(format!("{}/", base), None)])
        .unwrap();
    let summary = coordinator.run().await.unwrap();

    // "/", models.html, chair.zip, table.blend, secret.zip, big.zip, notes.txt, logo.png
    assert_eq!(summary.pages_processed, 8);
    assert_eq!(summary.models_extracted, 2);
    assert_eq!(summary.robots.misses, 1);
    assert_eq!(summary.robots.hits, 7);

    let raw_url = Url::parse(&format!("{}/raw/table.blend", base)).unwrap();
    let mut expected = vec!["chair.blend".to_string(), model_file_name(&raw_url)];
    expected.sort();
    let output = dir.path().join("models");
    assert_eq!(files_in(&output), expected);
    assert_eq!(
        std::fs::read(output.join("chair.blend")).unwrap(),
        b"BLENDER-v280 chair"
    );
    assert_eq!(
        std::fs::read(output.join(model_file_name(&raw_url))).unwrap(),
        b"BLENDER-v300 table"
    );

    let storage = SqliteStorage::new(&dir.path().join("frontier.db")).unwrap();
    assert_eq!(storage.count_unvisited().unwrap(), 0);
    assert_eq!(storage.count_total().unwrap(), 8);

    let chair = storage
        .get_record(&format!("{}/chair.zip", base))
        .unwrap()
        .unwrap();
    assert_eq!(chair.links_to, 2);
    assert_eq!(chair.priority, 1);

    let home = storage.get_record(&format!("{}/", base)).unwrap().unwrap();
    assert_eq!(home.links_to, 2);
    assert_eq!(home.priority, 2);

    // The disallowed archive was popped but never requested
    let secret = storage
        .get_record(&format!("{}/private/secret.zip", base))
        .unwrap()
        .unwrap();
    assert!(secret.visited);
}

#[tokio::test]
async fn test_second_run_resumes_from_stored_frontier() {
    let server = model_site().await;
    let dir = TempDir::new().unwrap();
    let seeds = vec![SeedEntry {
        url: format!("{}/", server.uri()),
        priority: None,
    }];

    let first = run_crawl(create_test_config(&dir, seeds.clone()))
        .await
        .unwrap();
    assert_eq!(first.pages_processed, 8);

    // The seed is already known and visited, so nothing is left to do
    let second = run_crawl(create_test_config(&dir, seeds)).await.unwrap();
    assert_eq!(second.pages_processed, 0);
    assert_eq!(second.models_extracted, 0);

    let storage = SqliteStorage::new(&dir.path().join("frontier.db")).unwrap();
    let home = storage
        .get_record(&format!("{}/", server.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(home.links_to, 3);
}

#[tokio::test]
async fn test_robots_server_error_allows_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount(
        &server,
        "/",
        r#"<a href="/lamp.blend">Lamp</a>"#,
        "text/html",
    )
    .await;
    mount(&server, "/lamp.blend", "BLENDER lamp", "text/plain").await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(create_test_config(&dir, vec![])).unwrap();
    coordinator
        .seed(&[Seed::new(format!("{}/", server.uri()), None)])
        .unwrap();

    let summary = coordinator.run().await.unwrap();
    assert_eq!(summary.pages_processed, 2);
    assert_eq!(summary.models_extracted, 1);
}

#[tokio::test]
async fn test_fetch_failures_do_not_stop_the_crawl() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        r#"<a href="/missing.zip">Missing</a><a href="/ok.blend">OK</a>"#,
        "text/html",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing.zip"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount(&server, "/ok.blend", "BLENDER ok", "text/plain").await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(create_test_config(&dir, vec![])).unwrap();
    coordinator
        .seed(&[Seed::new(format!("{}/", server.uri()), None)])
        .unwrap();

    let summary = coordinator.run().await.unwrap();
    assert_eq!(summary.pages_processed, 3);
    assert_eq!(summary.models_extracted, 1);
}
