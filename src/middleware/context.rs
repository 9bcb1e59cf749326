use axum::http::Extensions;

use crate::error::AuthorizePreconditionError;

/// Fetches a value an earlier stage must have attached, failing closed when it is absent.
pub fn require<'a, T>(
    extensions: &'a Extensions,
    stage: &'static str,
    missing: &'static str,
) -> Result<&'a T, AuthorizePreconditionError>
where
    T: Send + Sync + 'static,
{
    extensions
        .get::<T>()
        .ok_or(AuthorizePreconditionError { stage, missing })
}
