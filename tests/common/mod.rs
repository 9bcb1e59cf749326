#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use rowgate::{router, AppConfig, AppState};

pub const JWT_SECRET: &str = "integration-secret";
pub const BACKEND_TOKEN: &str = "backend-secret-token";
pub const BASE_ID: &str = "p_demo_base";

/// What the fake backend saw for one proxied data request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Clone, Default)]
struct MockState {
    tables: Arc<Mutex<Vec<(String, String)>>>,
    fail_meta: Arc<AtomicBool>,
    data_requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for the data backend, served on an ephemeral port.
pub struct MockBackend {
    pub base_url: String,
    state: MockState,
}

impl MockBackend {
    pub async fn start(tables: &[(&str, &str)]) -> Result<Self> {
        let state = MockState::default();
        state.set_tables(tables);

        let app = Router::new()
            .route("/api/v2/meta/bases/:base/tables", get(meta_tables))
            .route("/api/v2/tables/*path", any(table_data))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind mock backend")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            state,
        })
    }

    pub fn set_tables(&self, tables: &[(&str, &str)]) {
        self.state.set_tables(tables);
    }

    pub fn fail_meta(&self, fail: bool) {
        self.state.fail_meta.store(fail, Ordering::SeqCst);
    }

    pub fn data_requests(&self) -> Vec<RecordedRequest> {
        self.state.data_requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.data_requests().pop().expect("backend received no data request")
    }
}

impl MockState {
    fn set_tables(&self, tables: &[(&str, &str)]) {
        *self.tables.lock().unwrap() = tables
            .iter()
            .map(|(title, id)| (title.to_string(), id.to_string()))
            .collect();
    }
}

async fn meta_tables(
    State(state): State<MockState>,
    Path(base): Path<String>,
    headers: HeaderMap,
) -> Response {
    if headers.get("xc-token").and_then(|v| v.to_str().ok()) != Some(BACKEND_TOKEN) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"msg": "bad token"}))).into_response();
    }
    if base != BASE_ID {
        return (StatusCode::NOT_FOUND, Json(json!({"msg": "unknown base"}))).into_response();
    }
    if state.fail_meta.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"msg": "boom"}))).into_response();
    }

    let list: Vec<Value> = state
        .tables
        .lock()
        .unwrap()
        .iter()
        .map(|(title, id)| json!({"id": id, "title": title, "table_name": format!("nc_{}", title)}))
        .collect();
    Json(json!({"list": list, "pageInfo": {"totalRows": list.len()}})).into_response()
}

async fn table_data(
    State(state): State<MockState>,
    Path(path): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.clone(),
        path: format!("/api/v2/tables/{}", path),
        query: query.clone(),
        headers,
        body,
    };
    state.data_requests.lock().unwrap().push(recorded);

    let status = if method == Method::POST { StatusCode::CREATED } else { StatusCode::OK };
    (
        status,
        [("x-backend", "mock")],
        Json(json!({"path": path, "query": query, "list": []})),
    )
        .into_response()
}

pub fn config_for(base_url: &str) -> AppConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("BACKEND_URL", base_url.to_string()),
        ("BACKEND_BASE_ID", BASE_ID.to_string()),
        ("BACKEND_API_TOKEN", BACKEND_TOKEN.to_string()),
        ("JWT_SECRET", JWT_SECRET.to_string()),
        ("BACKEND_TIMEOUT_SECS", "5".to_string()),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config is complete")
}

/// Gateway wired to `backend` with the startup load already done.
pub async fn gateway(backend: &MockBackend) -> Result<(Router, AppState)> {
    let state = AppState::from_config(config_for(&backend.base_url))?;
    state.meta.load().await;
    Ok((router(state.clone()), state))
}

pub async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, HeaderMap, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
    };
    Ok((status, headers, body))
}

pub async fn login(app: &Router, email: &str, password: &str) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(json!({"email": email, "password": password}).to_string()))?;
    let (status, _, body) = send(app, request).await?;
    Ok((status, body))
}

pub async fn token_for(app: &Router, email: &str, password: &str) -> Result<String> {
    let (status, body) = login(app, email, password).await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed with {}: {}", status, body);
    Ok(body["token"].as_str().context("token missing")?.to_string())
}

pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .expect("valid request")
}
