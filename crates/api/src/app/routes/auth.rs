use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;

use flow_auth::{Account, LoginHandle, Registration};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// Public credential endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    let registration = match Registration::new(body.username, body.email, body.password) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // bcrypt is CPU-bound; keep it off the async workers.
    let authenticator = services.authenticator.clone();
    let account = match tokio::task::spawn_blocking(move || {
        authenticator.register(registration, Utc::now())
    })
    .await
    {
        Ok(Ok(account)) => account,
        Ok(Err(e)) => return errors::credential_error_to_response(e),
        Err(e) => {
            tracing::error!(error = %e, "registration task failed");
            return errors::internal_error();
        }
    };

    session_response(&services, &account, StatusCode::CREATED)
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    let handle = match (body.email, body.username) {
        (Some(email), _) if !email.trim().is_empty() => LoginHandle::Email(email),
        (_, Some(username)) if !username.trim().is_empty() => LoginHandle::Username(username),
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "email or username is required",
            );
        }
    };
    let password = body.password;

    let authenticator = services.authenticator.clone();
    let account =
        match tokio::task::spawn_blocking(move || authenticator.login(&handle, &password)).await {
            Ok(Ok(account)) => account,
            Ok(Err(e)) => return errors::credential_error_to_response(e),
            Err(e) => {
                tracing::error!(error = %e, "login task failed");
                return errors::internal_error();
            }
        };

    session_response(&services, &account, StatusCode::OK)
}

/// Profile of the authenticated identity (404 once the account is gone).
pub async fn profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    // No hashing here; the lookup runs inline and assumes a non-blocking store.
    match services.authenticator.account(principal.user_id()) {
        Ok(Some(account)) => (StatusCode::OK, Json(dto::profile_to_json(&account))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::credential_error_to_response(e),
    }
}

fn session_response(
    services: &AppServices,
    account: &Account,
    status: StatusCode,
) -> axum::response::Response {
    match services.tokens.issue(account.id, Utc::now()) {
        Ok(token) => (
            status,
            Json(dto::AuthResponse {
                token,
                user: account.summary(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            errors::internal_error()
        }
    }
}
