#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use listboard::config::Config;
use listboard::web::{AppState, create_app};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

/// Test context for endpoint tests.
pub struct TestContext {
    // Kept so the snapshot directory outlives the test.
    pub dir: TempDir,
    pub config: Config,
    pub app: Router,
}

impl TestContext {
    pub fn todos_file(&self) -> &Path {
        &self.config.todos_file
    }

    pub fn messages_file(&self) -> &Path {
        &self.config.messages_file
    }

    /// Sends a request and returns the status and body text.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    /// Sends every request from its own task and returns the statuses once
    /// all of them have completed.
    pub async fn send_concurrently(&self, requests: Vec<Request<Body>>) -> Vec<StatusCode> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let app = self.app.clone();
                tokio::spawn(async move { app.oneshot(request).await.unwrap().status() })
            })
            .collect();
        let mut statuses = Vec::with_capacity(handles.len());
        for handle in handles {
            statuses.push(handle.await.unwrap());
        }
        statuses
    }
}

/// Setup function for endpoint tests using snapshot files in a temp dir.
pub fn setup() -> TestContext {
    setup_with(|_| {})
}

/// Like [`setup`] but lets the caller seed or redirect the snapshot files
/// before the stores are opened.
pub fn setup_with(prepare: impl FnOnce(&mut Config)) -> TestContext {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config {
        port: 0,
        todos_file: dir.path().join("todos.json"),
        messages_file: dir.path().join("messages.json"),
    };
    prepare(&mut config);
    let app = create_app(AppState::from_config(&config));
    TestContext { dir, config, app }
}

/// A path whose parent directory does not exist, so every write fails.
pub fn unwritable(dir: &Path, name: &str) -> PathBuf {
    dir.join("missing-dir").join(name)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn form(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Reads a snapshot file back as JSON.
pub fn read_snapshot(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
