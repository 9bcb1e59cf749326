pub mod auth;
pub mod authorize;
pub mod context;
pub mod response;

pub use auth::{auth_middleware, authenticate, extract_bearer};
pub use authorize::{authorize, authorize_middleware, AccessScope};
pub use context::require;
pub use response::ApiResponse;
