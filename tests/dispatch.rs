//! End-to-end dispatch tests driving the real router with in-memory
//! requests.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use mdserve::config::{AppState, ServerConfig};
use mdserve::handlers;

const DOC: &str = "---title: T1\n---tags: x,y\n# Hi\n";

fn fixture_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/a.md"), DOC).unwrap();
    fs::write(dir.path().join("docs/b.txt"), "plain bytes\n").unwrap();
    dir
}

fn app_for(root: &Path) -> axum::Router {
    let config = ServerConfig {
        root: root.canonicalize().unwrap(),
        ip: "127.0.0.1".to_string(),
        port: 0,
    };
    handlers::router(AppState {
        config: Arc::new(config),
    })
}

async fn get(root: &Path, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let req = Request::builder()
        .uri(uri)
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap();
    let res = app_for(root).oneshot(req).await.unwrap();
    let status = res.status();
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = res.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, content_type, body)
}

#[tokio::test]
async fn missing_path_returns_plain_404() {
    let root = fixture_root();
    let (status, _, body) = get(root.path(), "/nonexistent/path").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"404");
}

#[tokio::test]
async fn embedded_stylesheets_are_served() {
    let root = fixture_root();
    for path in ["/md.css", "/fa.css"] {
        let (status, content_type, body) = get(root.path(), path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/css; charset=utf-8"));
        assert!(!body.is_empty());
    }
}

#[tokio::test]
async fn markdown_file_renders_to_html() {
    let root = fixture_root();
    let (status, content_type, body) = get(root.path(), "/docs/a.md").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<title>T1</title>"));
    assert!(html.contains("<a class=\"tag\">x</a>"));
    assert!(html.contains("<a class=\"tag\">y</a>"));
    assert!(html.contains("<h1 id=\"hi\">"));
    assert!(!html.contains("---title"));
}

#[tokio::test]
async fn raw_mode_returns_file_bytes_unmodified() {
    let root = fixture_root();
    let (status, _, body) = get(root.path(), "/docs/a.md?raw=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, DOC.as_bytes());

    // Without the flag the response is a transformed document.
    let (_, _, rendered) = get(root.path(), "/docs/a.md").await;
    assert_ne!(rendered, DOC.as_bytes());
}

#[tokio::test]
async fn opaque_files_are_streamed_as_is() {
    let root = fixture_root();
    let (status, _, body) = get(root.path(), "/docs/b.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"plain bytes\n");
}

#[tokio::test]
async fn directory_listing_emits_add_row_calls() {
    let root = fixture_root();
    let (status, content_type, body) = get(root.path(), "/docs").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("addRow(\"a.md\",\"a.md\",0,"));
    assert!(html.contains("addRow(\"b.txt\",\"b.txt\",0,"));
    // subdirectory listings carry exactly one synthetic parent row
    assert_eq!(html.matches("addRow(\"..\"").count(), 1);
    assert!(html.contains("start(\"localhost/docs\")"));
}

#[tokio::test]
async fn root_listing_has_no_parent_row() {
    let root = fixture_root();
    let (status, _, body) = get(root.path(), "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(!html.contains("addRow(\"..\""));
    assert!(html.contains("addRow(\"docs\",\"docs\",1,"));
}

#[tokio::test]
async fn traversal_attempts_are_not_found() {
    let root = fixture_root();
    let (status, _, body) = get(root.path(), "/%2e%2e/%2e%2e/etc/passwd").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"404");
}
