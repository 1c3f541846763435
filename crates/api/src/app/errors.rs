use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use flow_auth::{AuthzError, CredentialError};
use flow_core::{DomainError, StoreError};

pub fn credential_error_to_response(err: CredentialError) -> axum::response::Response {
    match err {
        CredentialError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string())
        }
        CredentialError::EmailTaken | CredentialError::UsernameTaken => {
            json_error(StatusCode::CONFLICT, "conflict", err.to_string())
        }
        CredentialError::Invalid(e) => domain_error_to_response(e),
        CredentialError::Hash(e) => {
            tracing::error!(error = %e, "credential hashing failed");
            internal_error()
        }
        CredentialError::Store(e) => store_error_to_response(e),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Duplicate { field } => {
            json_error(StatusCode::CONFLICT, "conflict", format!("{field} already exists"))
        }
        StoreError::Unavailable(msg) => {
            tracing::error!(error = %msg, "store failure");
            internal_error()
        }
    }
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

/// Any body that fails to bind is a 400, whatever axum's own status would be.
pub fn json_rejection_to_response(err: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text())
}

pub fn internal_error() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal server error",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
