use axum::{extract::State, http::Uri};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub tables: usize,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// GET / - Service descriptor
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "rowgate",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "login": "POST /login (public)",
            "health": "GET /health (public)",
            "whoami": "GET /whoami (protected)",
            "proxy": "ANY /proxy/:table[/*rest] (protected)",
        }
    }))
}

/// GET /health - Liveness plus metadata cache state
///
/// Always 200: a stale or empty cache degrades name resolution, it does not stop the gateway.
pub async fn health(State(state): State<AppState>) -> ApiResponse<HealthReport> {
    let snapshot = state.meta.snapshot();
    ApiResponse::success(HealthReport {
        status: if snapshot.refreshed_at().is_some() { "ok" } else { "degraded" },
        tables: snapshot.len(),
        last_refresh: snapshot.refreshed_at(),
    })
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
