pub mod app;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod meta;
pub mod middleware;
pub mod proxy;
pub mod state;
pub mod users;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
