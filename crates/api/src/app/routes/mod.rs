use axum::{Router, routing::get};

pub mod auth;
pub mod breakdowns;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/profile", get(auth::profile))
        .nest("/breakdowns", breakdowns::router())
}
