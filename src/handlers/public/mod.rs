// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and service liveness. No middleware beyond tracing and CORS.
pub mod health;
pub mod login;

pub use health::{health, not_found, root};
pub use login::login;
