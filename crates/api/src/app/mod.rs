//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, hasher and token codec wiring
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use flow_auth::TokenValidator;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router with in-memory stores (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Router {
    build_app_with(Arc::new(services::build_services(config)))
}

/// Build the router around already-wired services.
pub fn build_app_with(services: Arc<services::AppServices>) -> Router {
    let tokens: Arc<dyn TokenValidator> = services.tokens.clone();
    let auth_state = middleware::AuthState { tokens };

    // Protected routes: require a valid bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::auth::router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::trace_requests))
                .layer(Extension(services)),
        )
}
