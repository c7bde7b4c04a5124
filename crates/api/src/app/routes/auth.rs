//! Login endpoints: the only places tokens are minted.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use tokengate_auth::{IdentityClaims, verify_password};

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/token", post(token))
}

/// POST /auth/login - mint a token for a caller-declared username and role.
///
/// Only presence is checked; there is no backing credential.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let (Some(username), Some(role)) = (
        dto::non_blank(body.username.as_deref()),
        dto::non_blank(body.role.as_deref()),
    ) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Username and role are required",
        );
    };

    let claims = IdentityClaims::new(username)
        .with_role(role.to_string())
        .with_claim("username", username);

    mint(&services, &claims)
}

/// POST /auth/token - mint a token after checking email and password.
pub async fn token(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::TokenRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let (Some(email), Some(password)) = (
        dto::non_blank(body.email.as_deref()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Email and password are required",
        );
    };

    let Some(user) = services.users.find_by_email(email) else {
        return invalid_login();
    };
    let Some(hash) = user.password_hash.clone() else {
        return invalid_login();
    };

    // Argon2 is CPU-bound; run it off the async workers.
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await;
    match verified {
        Ok(Ok(true)) => {}
        Ok(Ok(false)) => return invalid_login(),
        Ok(Err(e)) => return errors::password_error_to_response(e),
        Err(e) => return errors::internal_error(e),
    }

    let mut claims = IdentityClaims::new(user.id.to_string())
        .with_claim("id", user.id.get())
        .with_claim("email", user.email.as_str());
    if let Some(role) = user.role {
        claims = claims.with_role(role);
    }

    mint(&services, &claims)
}

fn mint(services: &AppServices, claims: &IdentityClaims) -> axum::response::Response {
    match services.issuer.issue(claims, services.token_ttl) {
        Ok(token) => {
            tracing::info!(sub = %claims.subject(), "login succeeded");
            (
                StatusCode::OK,
                Json(dto::TokenResponse {
                    token: token.into_string(),
                }),
            )
                .into_response()
        }
        Err(e) => errors::issue_error_to_response(e),
    }
}

fn invalid_login() -> axum::response::Response {
    tracing::info!("login rejected: invalid email or password");
    errors::json_error(
        StatusCode::BAD_REQUEST,
        "invalid_credentials",
        "Invalid email or password",
    )
}
