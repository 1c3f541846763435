use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;

use flow_breakdowns::{Breakdown, BreakdownDraft};
use flow_core::Entity;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz::load_owned_breakdown;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_breakdowns).post(create_breakdown))
        .route(
            "/:id",
            get(get_breakdown).put(update_breakdown).delete(delete_breakdown),
        )
}

/// Breakdowns owned by the caller only.
pub async fn list_breakdowns(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.breakdowns.list_by_owner(principal.user_id()) {
        Ok(items) => {
            let items = items.iter().map(dto::breakdown_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_breakdown(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::BreakdownRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let draft = match BreakdownDraft::new(body.name, body.description) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // Owner is assigned, never checked, on create.
    let breakdown = Breakdown::create(principal.user_id(), draft, Utc::now());
    if let Err(e) = services.breakdowns.insert(breakdown.clone()) {
        return errors::store_error_to_response(e);
    }

    tracing::info!(breakdown_id = %breakdown.id(), owner = %principal.user_id(), "breakdown created");
    (StatusCode::CREATED, Json(dto::breakdown_to_json(&breakdown))).into_response()
}

pub async fn get_breakdown(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match load_owned_breakdown(&services, &principal, &id) {
        Ok(b) => (StatusCode::OK, Json(dto::breakdown_to_json(&b))).into_response(),
        Err(res) => res,
    }
}

pub async fn update_breakdown(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::BreakdownRequest>, JsonRejection>,
) -> axum::response::Response {
    // Ownership is decided before the body is looked at.
    let mut breakdown = match load_owned_breakdown(&services, &principal, &id) {
        Ok(b) => b,
        Err(res) => return res,
    };

    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let draft = match BreakdownDraft::new(body.name, body.description) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    breakdown.revise(draft, Utc::now());
    match services.breakdowns.update(breakdown.clone()) {
        Ok(true) => (StatusCode::OK, Json(dto::breakdown_to_json(&breakdown))).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "breakdown not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_breakdown(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let breakdown = match load_owned_breakdown(&services, &principal, &id) {
        Ok(b) => b,
        Err(res) => return res,
    };

    match services.breakdowns.delete(*breakdown.id()) {
        Ok(true) => {
            tracing::info!(breakdown_id = %breakdown.id(), "breakdown deleted");
            (
                StatusCode::OK,
                Json(serde_json::json!({ "message": "breakdown deleted" })),
            )
                .into_response()
        }
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "breakdown not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
