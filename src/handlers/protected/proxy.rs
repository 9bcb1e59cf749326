use axum::{
    body::to_bytes,
    extract::{Path, Request, State},
    response::Response,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::IdentityClaims;
use crate::error::{ApiError, ProxyError};
use crate::middleware::{require, AccessScope};
use crate::proxy::compose_target;
use crate::state::AppState;

/// Largest request body relayed to the backend.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// ANY /proxy/:table[/*rest] - Forward to the backend table behind a friendly name
///
/// `:table` may be a friendly name (any case) or a raw backend identifier;
/// names the metadata cache does not know are sent upstream unchanged.
/// Non-admin callers get `where=(created_by,eq,<subject>)` merged into the query.
///
/// The injected `where` only constrains backend endpoints that honor it, which
/// are the list-style reads. Single-record reads (`records/{id}`) and
/// PATCH/DELETE calls that address rows by id in the body are not limited by
/// it; the backend sees them as issued.
pub async fn proxy(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let scope = require::<AccessScope>(&parts.extensions, "proxy", "access scope")?;
    let claims = require::<IdentityClaims>(&parts.extensions, "proxy", "identity claims")?;

    let table = params
        .get("table")
        .ok_or_else(|| ApiError::bad_request("Missing table name"))?;
    let rest = params.get("rest").map(String::as_str).unwrap_or_default();

    let table_id = state.meta.resolve(table);
    let target = compose_target(
        &state.config.backend.base_url,
        &table_id,
        rest,
        parts.uri.query(),
        scope.filter.as_ref(),
    )?;

    tracing::debug!(
        request_id = %Uuid::new_v4(),
        subject = %claims.subject,
        method = %parts.method,
        table = %table,
        table_id = %target.table_id,
        filtered = target.filtered,
        "Proxying request"
    );

    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(ProxyError::from)?;
    let response = state
        .forwarder
        .forward(parts.method, target.url, &parts.headers, body)
        .await?;

    Ok(response)
}
