use axum::Extension;
use serde::Serialize;

use crate::auth::IdentityClaims;
use crate::filter::FilterDirective;
use crate::middleware::{AccessScope, ApiResponse};

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    #[serde(flatten)]
    pub claims: IdentityClaims,
    pub row_filter: Option<FilterDirective>,
}

/// GET /whoami - The caller's verified claims and the row filter their requests carry
pub async fn whoami(
    Extension(claims): Extension<IdentityClaims>,
    Extension(scope): Extension<AccessScope>,
) -> ApiResponse<WhoAmI> {
    ApiResponse::success(WhoAmI {
        claims,
        row_filter: scope.filter,
    })
}
