//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::store::TransactionRepository;

pub use routes::{create_router, AppState};

/// Build the full application: health check, `/api` routes and layers.
pub fn build_router<R: TransactionRepository>(state: AppState<R>) -> Router {
    // Axum layers run in reverse order (last added = first executed):
    // set request id -> propagate -> trace -> logging -> handler
    let api_routes = create_router::<R>().layer(axum_middleware::from_fn(
        middleware::logging_middleware,
    ));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
