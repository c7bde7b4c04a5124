use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE};
use axum::response::IntoResponse;
use serde_json::json;

use tokengate_auth::{AuthError, IssueError, PasswordError};
use tokengate_core::DomainError;

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

/// 401 for authentication failures (with a `Bearer` challenge), 403 for the role gate.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    if err.is_forbidden() {
        return json_error(StatusCode::FORBIDDEN, err.code(), err.to_string());
    }

    let mut response = json_error(StatusCode::UNAUTHORIZED, err.code(), err.to_string());
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn issue_error_to_response(err: IssueError) -> axum::response::Response {
    tracing::error!(error = %err, "token issuance failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "token_issue_failed",
        "could not issue token",
    )
}

pub fn password_error_to_response(err: PasswordError) -> axum::response::Response {
    tracing::error!(error = %err, "password hashing failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
}

pub fn internal_error(msg: impl core::fmt::Display) -> axum::response::Response {
    tracing::error!(error = %msg, "internal error");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
}

/// Body could not be read as the expected JSON shape.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(rejection.status(), "invalid_body", rejection.body_text())
}
