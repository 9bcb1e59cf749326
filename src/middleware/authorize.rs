use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth::IdentityClaims;
use crate::error::{ApiError, AuthorizePreconditionError};
use crate::filter::FilterDirective;

/// Row visibility decided for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessScope {
    /// `None` means full visibility.
    pub filter: Option<FilterDirective>,
}

impl AccessScope {
    pub fn unrestricted() -> Self {
        Self { filter: None }
    }

    pub fn owned_by(subject: &str) -> Self {
        Self {
            filter: Some(FilterDirective::owned_by(subject)),
        }
    }
}

/// Admins see everything; everyone else only the rows they created.
///
/// Deliberately blind to the target table: the same rule applies to any collection.
pub fn authorize(claims: Option<&IdentityClaims>) -> Result<AccessScope, AuthorizePreconditionError> {
    let claims = claims.ok_or(AuthorizePreconditionError {
        stage: "authorize",
        missing: "identity claims",
    })?;

    if claims.is_admin() {
        Ok(AccessScope::unrestricted())
    } else {
        Ok(AccessScope::owned_by(&claims.subject))
    }
}

/// Must be layered inside `auth_middleware`. Never rejects an authenticated request.
pub async fn authorize_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let scope = authorize(request.extensions().get::<IdentityClaims>())?;

    request.extensions_mut().insert(scope);
    Ok(next.run(request).await)
}
