//! Integration tests for the docset builder
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full build cycle end-to-end.

use docset_ripple::config::{parse_config, Config, ConfigOverrides};
use docset_ripple::crawler::{build_docset, build_docset_with_observer, CrawlObserver};
use docset_ripple::storage::{IndexStore, SqliteIndexStore};
use docset_ripple::{DocTree, DocsetError};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration seeded at `seed`, writing below `root`
fn create_test_config(seed: &str, root: &Path, max_depth: u32, extra: &str) -> Config {
    let content = format!(
        r#"
[docset]
path = "{}"
name = "test"

[crawler]
url = "{}"
max-depth = {}

[plist]
cfbundle-identifier = "test"
cfbundle-name = "pkg"
docset-platform-family = "test"

[http]
timeout-secs = 5

{}
"#,
        root.display(),
        seed,
        max_depth,
        extra
    );
    parse_config(&content, &ConfigOverrides::default()).expect("valid test config")
}

/// `host:port` of the mock server, the first segment of every local path
fn authority(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

fn html(body: &str) -> String {
    format!(
        "<html><head><title>test</title></head><body>{}</body></html>",
        body
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html(body), "text/html"))
        .mount(server)
        .await;
}

fn read_document(root: &Path, local_path: &str) -> String {
    let tree = DocTree::new(root, "test");
    let path = tree.document_path(local_path).expect("path inside Documents");
    std::fs::read_to_string(path).expect("document written")
}

#[tokio::test]
async fn test_h1_becomes_package_entry_with_anchor() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/docs/pkg", "<main><h1>pkg</h1><p>text</p></main>").await;

    let seed = format!("{}/docs/pkg", server.uri());
    let config = create_test_config(
        &seed,
        dir.path(),
        2,
        r#"
[[index]]
selector = "h1"
type = "Package"
name = { type = "text" }
"#,
    );

    let report = build_docset(&config).await.expect("build succeeds");
    let local = format!("{}/docs/pkg.html", authority(&server));

    assert_eq!(report.pages, 1);
    assert_eq!(report.index_file_path, local);

    let h1_entries: Vec<_> = report
        .entries
        .iter()
        .filter(|e| !e.anchor.is_empty())
        .collect();
    assert_eq!(h1_entries.len(), 1);
    assert_eq!(h1_entries[0].name, "pkg");
    assert_eq!(h1_entries[0].entry_type, "Package");
    assert_eq!(h1_entries[0].local_path, local);

    let written = read_document(dir.path(), &local);
    assert!(written
        .contains(r#"<a class="dashAnchor" name="//dash_ref_pkg/Package/pkg/0"></a><h1>pkg</h1>"#));
    assert!(written.contains(r#"<link href="//dash_ref_pkg/Package/pkg/0">"#));
    assert!(written.contains(&format!("<!--Online page at {}-->", seed)));
}

#[tokio::test]
async fn test_plist_and_index_written() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/docs/pkg", "<h2>Intro</h2><h2>Usage</h2>").await;

    let config = create_test_config(
        &format!("{}/docs/pkg", server.uri()),
        dir.path(),
        1,
        r#"
[[index]]
selector = "h2"
type = "Section"
"#,
    );

    let report = build_docset(&config).await.unwrap();
    let tree = DocTree::new(dir.path(), "test");

    let plist = std::fs::read_to_string(tree.info_plist()).unwrap();
    assert!(plist.contains("<string>pkg</string>"));
    assert!(plist.contains(&report.index_file_path));

    let store = SqliteIndexStore::open_existing(tree.db()).unwrap();
    assert_eq!(store.count_entries().unwrap(), 3);
    assert_eq!(report.entries_indexed, 3);
}

#[tokio::test]
async fn test_image_saved_and_src_rewritten() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/docs/pkg", r#"<img src="/docs/logo.png">"#).await;
    Mock::given(method("GET"))
        .and(path("/docs/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"PNGDATA".to_vec(), "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/docs/pkg", server.uri()), dir.path(), 2, "");
    let report = build_docset(&config).await.unwrap();
    let auth = authority(&server);

    assert_eq!(report.resources_saved, 1);

    let tree = DocTree::new(dir.path(), "test");
    let saved = std::fs::read(tree.document_path(&format!("{}/docs/logo.png", auth)).unwrap()).unwrap();
    assert_eq!(saved, b"PNGDATA");

    let written = read_document(dir.path(), &format!("{}/docs/pkg.html", auth));
    assert!(written.contains(&format!(r#"src="../../{}/docs/logo.png""#, auth)));
}

/// Collects every file below `dir`
fn files_below(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap().path();
        if entry.is_dir() {
            files.extend(files_below(&entry));
        } else {
            files.push(entry);
        }
    }
    files
}

#[tokio::test]
async fn test_encoded_separators_stay_inside_documents() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let escape = format!("a{}pwned.txt", "%2F..".repeat(8) + "%2F");
    mount_page(
        &server,
        "/docs/pkg",
        &format!(r#"<img src="/docs/pkg/{}">"#, escape),
    )
    .await;
    Mock::given(method("GET"))
        .and(path_regex(r"pwned\.txt$"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"owned".to_vec(), "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/docs/pkg", server.uri()), dir.path(), 2, "");
    let report = build_docset(&config).await.unwrap();
    let auth = authority(&server);

    assert_eq!(report.resources_saved, 1);
    assert!(!dir.path().join("pwned.txt").exists());

    let tree = DocTree::new(dir.path(), "test");
    let saved = tree
        .document_path(&format!("{}/docs/pkg/{}", auth, escape))
        .unwrap();
    assert_eq!(std::fs::read(&saved).unwrap(), b"owned");

    let documents = tree.documents().to_path_buf();
    for file in files_below(dir.path()) {
        let name = file.file_name().unwrap().to_string_lossy().to_string();
        if name.contains("pwned") {
            assert!(file.starts_with(&documents), "{} escaped", file.display());
        }
    }

    let written = read_document(dir.path(), &format!("{}/docs/pkg.html", auth));
    assert!(written.contains(&format!(r#"src="../../{}/docs/pkg/{}""#, auth, escape)));
}

#[tokio::test]
async fn test_shared_resource_fetched_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(
        &server,
        "/docs/pkg",
        r#"<img src="/static/logo.png"><a href="/docs/pkg/sub">sub</a>"#,
    )
    .await;
    mount_page(&server, "/docs/pkg/sub", r#"<img src="/static/logo.png?v=2">"#).await;
    Mock::given(method("GET"))
        .and(path("/static/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"PNG".to_vec(), "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/docs/pkg", server.uri()), dir.path(), 2, "");
    let report = build_docset(&config).await.unwrap();
    let auth = authority(&server);

    assert_eq!(report.pages, 2);
    assert_eq!(report.resources_saved, 1);

    let seed = read_document(dir.path(), &format!("{}/docs/pkg.html", auth));
    assert!(seed.contains(&format!(r#"href="../../{}/docs/pkg/sub.html""#, auth)));

    let sub = read_document(dir.path(), &format!("{}/docs/pkg/sub.html", auth));
    assert!(sub.contains(&format!(r#"src="../../../{}/static/logo.png?v=2""#, auth)));

    server.verify().await;
}

#[tokio::test]
async fn test_depth_limit_stops_recursion() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/docs/pkg", r#"<a href="/docs/pkg/sub">sub</a>"#).await;
    mount_page(
        &server,
        "/docs/pkg/sub",
        r#"<a href="/docs/pkg/sub/deeper">deeper</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/pkg/sub/deeper"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html("deep"), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/docs/pkg", server.uri()), dir.path(), 2, "");
    let report = build_docset(&config).await.unwrap();

    assert_eq!(report.pages, 2);
    let sub = read_document(
        dir.path(),
        &format!("{}/docs/pkg/sub.html", authority(&server)),
    );
    assert!(sub.contains(&format!(r#"href="{}/docs/pkg/sub/deeper""#, server.uri())));

    server.verify().await;
}

#[tokio::test]
async fn test_sub_path_regex_limits_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(
        &server,
        "/docs",
        r#"<a href="/docs/v2/client">v2</a><a href="/docs/v1/client">v1</a>"#,
    )
    .await;
    mount_page(&server, "/docs/v2/client", "<p>v2</p>").await;
    Mock::given(method("GET"))
        .and(path("/docs/v1/client"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html("v1"), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(
        &format!("{}/docs", server.uri()),
        dir.path(),
        3,
        "",
    );
    let mut config = config;
    config.crawler.sub_path_regex = Some("^/docs/v2".to_string());

    let report = build_docset(&config).await.unwrap();
    assert_eq!(report.pages, 2);

    server.verify().await;
}

#[derive(Default)]
struct MissingRecorder {
    missing: Mutex<Vec<String>>,
}

impl CrawlObserver for MissingRecorder {
    fn resource_missing(&self, url: &Url, _page: &Url) {
        self.missing.lock().unwrap().push(url.path().to_string());
    }
}

#[tokio::test]
async fn test_missing_resource_removes_elements() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(
        &server,
        "/docs/pkg",
        r#"<p><img src="/docs/gone.png" alt="gone"></p><script src="/docs/gone.png"></script><p>kept</p>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/docs/pkg", server.uri()), dir.path(), 1, "");
    let recorder = Arc::new(MissingRecorder::default());
    let report = build_docset_with_observer(&config, recorder.clone())
        .await
        .unwrap();

    assert_eq!(report.resources_missing, 1);
    assert_eq!(*recorder.missing.lock().unwrap(), vec!["/docs/gone.png"]);

    let written = read_document(
        dir.path(),
        &format!("{}/docs/pkg.html", authority(&server)),
    );
    assert!(!written.contains("gone.png"));
    assert!(!written.contains("<script"));
    assert!(written.contains("<p>kept</p>"));

    server.verify().await;
}

#[tokio::test]
async fn test_missing_seed_is_not_found() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/docs/pkg", server.uri()), dir.path(), 1, "");
    let result = build_docset(&config).await;

    assert!(result.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_server_error_aborts_build() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/docs/pkg", r#"<link rel="stylesheet" href="/docs/site.css">"#).await;
    Mock::given(method("GET"))
        .and(path("/docs/site.css"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/docs/pkg", server.uri()), dir.path(), 1, "");
    let result = build_docset(&config).await;

    match result {
        Err(DocsetError::Status { url, status }) => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/docs/site.css"));
        }
        other => panic!("expected status error, got {:?}", other.map(|r| r.pages)),
    }
}

#[tokio::test]
async fn test_foreign_and_outside_links_untouched() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(
        &server,
        "/docs/pkg",
        r##"<a href="https://other.example.org/x">ext</a>
<a href="/blog/post">blog</a>
<a href="#top">top</a>
<a href="mailto:team@example.org">mail</a>"##,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/blog/post"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html("blog"), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/docs/pkg", server.uri()), dir.path(), 3, "");
    let report = build_docset(&config).await.unwrap();
    let auth = authority(&server);

    assert_eq!(report.pages, 1);
    let written = read_document(dir.path(), &format!("{}/docs/pkg.html", auth));
    assert!(written.contains(r#"href="https://other.example.org/x""#));
    assert!(written.contains(&format!(r#"href="{}/blog/post""#, server.uri())));
    assert!(written.contains(&format!(r##"href="../../{}/docs/pkg.html#top""##, auth)));
    assert!(written.contains(r#"href="mailto:team@example.org""#));

    server.verify().await;
}

#[tokio::test]
async fn test_page_rules_run_before_localization() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(
        &server,
        "/docs/pkg",
        r#"<nav><img src="/nav.png"></nav><details class="doc">body</details>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/nav.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"PNG".to_vec(), "image/png"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(
        &format!("{}/docs/pkg", server.uri()),
        dir.path(),
        1,
        r#"
[page]
remove-node-selector = ["nav"]

[[page.set-attrs]]
selector = "details.doc"
attr = { key = "open", value = "" }
"#,
    );
    let report = build_docset(&config).await.unwrap();

    assert_eq!(report.resources_saved, 0);
    let written = read_document(
        dir.path(),
        &format!("{}/docs/pkg.html", authority(&server)),
    );
    assert!(!written.contains("<nav>"));
    assert!(written.contains(r#"<details class="doc" open="">"#));

    server.verify().await;
}

#[tokio::test]
async fn test_duplicate_entries_ignored_by_index() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/docs/pkg", "<h2>Intro</h2><h2>Intro</h2>").await;

    let config = create_test_config(
        &format!("{}/docs/pkg", server.uri()),
        dir.path(),
        1,
        r#"
[[index]]
selector = "h2"
type = "Section"
"#,
    );
    let report = build_docset(&config).await.unwrap();

    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.entries_indexed, 2);
}

#[tokio::test]
async fn test_rebuild_replaces_previous_docset() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/docs/pkg", "<h2>Intro</h2>").await;

    let config = create_test_config(
        &format!("{}/docs/pkg", server.uri()),
        dir.path(),
        1,
        r#"
[[index]]
selector = "h2"
type = "Section"
"#,
    );
    build_docset(&config).await.unwrap();
    let report = build_docset(&config).await.unwrap();

    let tree = DocTree::new(dir.path(), "test");
    let store = SqliteIndexStore::open_existing(tree.db()).unwrap();
    assert_eq!(store.count_entries().unwrap(), 2);
    assert_eq!(report.entries_indexed, 2);
}
