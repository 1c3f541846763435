//! API-side ownership gate for owned resources.
//!
//! Resolves a path id to a resource and applies the ownership guard before a
//! handler may read or mutate it. Outcomes stay distinguishable on the wire:
//! malformed id 400, absent 404, someone else's 403.

use axum::http::StatusCode;

use flow_auth::authorize_owner;
use flow_breakdowns::Breakdown;
use flow_core::BreakdownId;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Load a breakdown the principal is allowed to act on.
pub fn load_owned_breakdown(
    services: &AppServices,
    principal: &PrincipalContext,
    id: &str,
) -> Result<Breakdown, axum::response::Response> {
    let id: BreakdownId = id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid breakdown id")
    })?;

    let breakdown = services
        .breakdowns
        .get(id)
        .map_err(errors::store_error_to_response)?
        .ok_or_else(|| errors::json_error(StatusCode::NOT_FOUND, "not_found", "breakdown not found"))?;

    authorize_owner(principal.user_id(), &breakdown).map_err(errors::authz_error_to_response)?;

    Ok(breakdown)
}
