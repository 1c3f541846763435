use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use thiserror::Error;

use flow_auth::TokenValidator;

use crate::app::errors::json_error;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenValidator>,
}

/// Why the authentication gate turned a request away. Always a 401.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    #[error("authorization header is required")]
    MissingAuthorization,

    #[error("authorization header format must be Bearer <token>")]
    MalformedAuthorization,

    #[error("invalid or expired token")]
    InvalidToken,
}

impl GateRejection {
    fn code(self) -> &'static str {
        match self {
            Self::MissingAuthorization => "authorization_required",
            Self::MalformedAuthorization => "malformed_authorization",
            Self::InvalidToken => "invalid_token",
        }
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        json_error(StatusCode::UNAUTHORIZED, self.code(), self.to_string())
    }
}

/// Authentication gate: bearer token -> [`PrincipalContext`], or 401.
///
/// Consults only the signed token, never the account store.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, GateRejection> {
    let token = extract_bearer(req.headers()).inspect_err(|e| {
        tracing::debug!(reason = %e, "request rejected by auth gate");
    })?;

    let user_id = state.tokens.validate(token, Utc::now()).map_err(|_| {
        tracing::debug!("request rejected by auth gate: token validation failed");
        GateRejection::InvalidToken
    })?;

    req.extensions_mut().insert(PrincipalContext::new(user_id));

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The header must split on a single space into exactly two parts, the first
/// being `Bearer`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, GateRejection> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(GateRejection::MissingAuthorization)?;

    let header = header
        .to_str()
        .map_err(|_| GateRejection::MalformedAuthorization)?;
    if header.is_empty() {
        return Err(GateRejection::MissingAuthorization);
    }

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(GateRejection::MalformedAuthorization),
    }
}

/// Access log: one line per request.
pub async fn trace_requests(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn missing_header() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(GateRejection::MissingAuthorization));
        assert_eq!(extract_bearer(&headers("")), Err(GateRejection::MissingAuthorization));
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn other_shapes_are_malformed() {
        for value in [
            "abc.def.ghi",
            "Basic dXNlcjpwdw==",
            "bearer abc",
            "Bearer",
            "Bearer ",
            "Bearer  abc",
            "Bearer abc def",
            "Token abc",
        ] {
            assert_eq!(
                extract_bearer(&headers(value)),
                Err(GateRejection::MalformedAuthorization),
                "{value:?}"
            );
        }
    }

    #[test]
    fn rejections_are_401() {
        for r in [
            GateRejection::MissingAuthorization,
            GateRejection::MalformedAuthorization,
            GateRejection::InvalidToken,
        ] {
            assert_eq!(r.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }
}
