use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{any, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::middleware::{auth_middleware, authorize_middleware};
use crate::state::AppState;

/// Full gateway router: public routes plus the auth → authorize → handler chain.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::login))
        // Protected
        .merge(protected_routes(state.clone()))
        .fallback(handlers::not_found)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    // route_layer: last added runs first, so auth wraps authorize
    Router::new()
        .route("/whoami", get(handlers::whoami))
        .route("/proxy/:table", any(handlers::proxy))
        .route("/proxy/:table/*rest", any(handlers::proxy))
        .route_layer(from_fn(authorize_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware))
}
