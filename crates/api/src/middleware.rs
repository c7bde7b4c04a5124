//! Request-side guard and role gate, run before any protected handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use tokengate_auth::{
    AuthError, RoleRequirement, TokenVerifier, VerifiedIdentity, authenticate_with, authorize,
};

use crate::app::errors;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Authenticate the request; on success attach the [`VerifiedIdentity`].
///
/// Rejected requests never reach the handler.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    // A header that is not visible ASCII cannot be `Bearer <token>`.
    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match authenticate_with(state.verifier.as_ref(), presented, Utc::now()) {
        Ok(identity) => {
            tracing::debug!(sub = %identity.subject(), path = %req.uri().path(), "authenticated");
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => {
            log_rejection(&req, err);
            errors::auth_error_to_response(err)
        }
    }
}

/// Role gate for a single route; the requirement is fixed at registration.
///
/// Must be layered inside [`auth_middleware`].
pub async fn role_gate(
    State(required): State<Arc<RoleRequirement>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(identity) = req.extensions().get::<VerifiedIdentity>() else {
        tracing::error!(path = %req.uri().path(), "role gate reached without an authenticated identity");
        return errors::auth_error_to_response(AuthError::MissingCredential);
    };

    if let Err(err) = authorize(identity, &required) {
        log_rejection(&req, err);
        return errors::auth_error_to_response(err);
    }

    next.run(req).await
}

fn log_rejection(req: &Request, err: AuthError) {
    let method = req.method();
    let path = req.uri().path();
    match err {
        AuthError::InvalidCredential => {
            tracing::warn!(code = err.code(), %method, path, "request rejected")
        }
        _ => tracing::info!(code = err.code(), %method, path, "request rejected"),
    }
}
