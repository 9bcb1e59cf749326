// handlers/public/login.rs - POST /login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// POST /login - Exchange email and password for a bearer token
///
/// Expected Input:
/// ```json
/// { "email": "user@example.com", "password": "user123" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiI...",
///   "user_id": "user-001",
///   "role": "user",
///   "expires_at": "2025-01-02T12:00:00Z"
/// }
/// ```
///
/// Wrong credentials get a 401 with no token and no hint which field was wrong.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let Some(user) = state.users.authenticate(&payload.email, &payload.password).await else {
        tracing::warn!(email = %payload.email, "Login failed");
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let issued = state.tokens.issue(&user.user_id, user.role)?;
    tracing::info!(user_id = %user.user_id, role = %user.role, "Login succeeded");

    Ok(Json(LoginResponse {
        token: issued.token,
        user_id: user.user_id,
        role: user.role,
        expires_at: issued.claims.expires_at,
    }))
}
