use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{IdentityClaims, TokenService};
use crate::error::{ApiError, AuthError};
use crate::state::AppState;

/// Bearer authentication middleware. Rejects before any downstream stage runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(request.headers(), &state.tokens).map_err(|err| {
        tracing::warn!(
            reason = err.reason(),
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected unauthenticated request"
        );
        ApiError::from(err)
    })?;

    tracing::debug!(subject = %claims.subject, role = %claims.role, "Request authenticated");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Verifies the bearer token carried by `headers`.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<IdentityClaims, AuthError> {
    let token = extract_bearer(headers)?;
    tokens.verify(token)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::Malformed)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::Missing)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Missing);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Missing);
    }
    Ok(token)
}
