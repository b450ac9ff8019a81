#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use osm_model::Model;
use osm_parser_api::config::ServiceConfig;
use osm_parser_api::engine::{ModelEngine, OsmEngine};
use osm_parser_api::http::{create_router, AppState};
use osm_toolkit::{ObjectType, Table};
use serde_json::Value;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub const BOUNDARY: &str = "osm-parser-test-boundary";

pub const SMALL_OFFICE: &str = include_str!("../fixtures/small_office.osm");

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// `OsmEngine` that counts how many models it was asked to load.
#[derive(Default)]
pub struct CountingEngine {
    loads: AtomicUsize,
}

impl CountingEngine {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelEngine for CountingEngine {
    fn load(&self, path: &Path) -> osm_model::Result<Model> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        OsmEngine.load(path)
    }

    fn extract(&self, model: &Model, object_type: ObjectType) -> osm_toolkit::Result<Table> {
        OsmEngine.extract(model, object_type)
    }
}

/// Default configuration with uploads rooted in `temp_root`.
pub fn config_in(temp_root: &Path) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.uploads.temp_dir = Some(temp_root.to_path_buf());
    config
}

pub fn router_with(config: ServiceConfig, engine: Arc<dyn ModelEngine>) -> Router {
    create_router(AppState::new(config, engine).unwrap())
}

pub fn router_in(temp_root: &Path) -> Router {
    router_with(config_in(temp_root), Arc::new(OsmEngine))
}

/// Multipart body with a single `file` field.
pub fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Multipart body with one text field and no file.
pub fn multipart_without_file() -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"comment\"\r\n\r\n\
         no model here\r\n--{b}--\r\n",
        b = BOUNDARY
    )
    .into_bytes()
}

/// `POST /parse` with the given query string and multipart body.
pub fn parse_request(query: &str, body: Vec<u8>) -> Request<Body> {
    let uri = if query.is_empty() {
        "/parse".to_string()
    } else {
        format!("/parse?{}", query)
    };
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Number of entries left under the upload root.
pub fn leftover_uploads(temp_root: &Path) -> usize {
    std::fs::read_dir(temp_root).unwrap().count()
}
