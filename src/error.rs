// Gateway error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

/// Startup configuration failures. Fatal: the process never serves traffic with these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

/// Why a request failed authentication. Only surfaced in logs; callers see a plain 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    Missing,

    #[error("malformed or tampered token")]
    Malformed,

    #[error("token expired")]
    Expired,
}

impl AuthError {
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::Missing => "missing",
            AuthError::Malformed => "malformed",
            AuthError::Expired => "expired",
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// A pipeline stage ran without the context an earlier stage should have attached.
#[derive(Debug, Error)]
#[error("{stage} requires {missing} in the request context")]
pub struct AuthorizePreconditionError {
    pub stage: &'static str,
    pub missing: &'static str,
}

/// Metadata listing failures. Logged and swallowed by the cache.
#[derive(Debug, Error)]
pub enum MetaLoadError {
    #[error("metadata request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid metadata URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A caller-supplied `where` that cannot be safely nested under the ownership clause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unbalanced parentheses in where clause: {0}")]
    UnbalancedWhere(String),
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("rejected row filter: {0}")]
    Filter(#[from] FilterError),
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (backend issues)
    BadGateway(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }
}

// Every authentication failure looks the same from the outside.
impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::unauthorized("Unauthorized")
    }
}

impl From<AuthorizePreconditionError> for ApiError {
    fn from(err: AuthorizePreconditionError) -> Self {
        tracing::error!("Request pipeline misconfigured: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        tracing::error!("Token issuance failed: {}", err);
        ApiError::internal_server_error("Failed to issue token")
    }
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::Body(e) => ApiError::bad_request(format!("Invalid request body: {}", e)),
            ProxyError::Upstream(e) => {
                tracing::error!("Backend request failed: {}", e);
                ApiError::bad_gateway("Backend unavailable")
            }
            ProxyError::Url(e) => {
                tracing::error!("Could not build backend URL: {}", e);
                ApiError::bad_request("Invalid proxy path")
            }
            ProxyError::Filter(e) => {
                tracing::warn!("Rejected caller filter: {}", e);
                ApiError::bad_request("Invalid where filter")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
