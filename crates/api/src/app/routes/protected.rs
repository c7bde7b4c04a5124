//! Routes behind the access guard, some with an additional role gate.

use std::sync::Arc;

use axum::{Json, Router, response::IntoResponse, routing::get};
use serde_json::{Value, json};

use tokengate_auth::RoleRequirement;

use crate::context::CurrentIdentity;
use crate::middleware;

/// Router for authenticated endpoints. The caller layers the guard on top.
pub fn router() -> Router {
    Router::new()
        .route("/protected", get(protected))
        .route("/whoami", get(whoami))
        .route(
            "/user",
            get(user).route_layer(axum::middleware::from_fn_with_state(
                Arc::new(RoleRequirement::any()),
                middleware::role_gate,
            )),
        )
        .route(
            "/admin",
            get(admin).route_layer(axum::middleware::from_fn_with_state(
                Arc::new(RoleRequirement::any_of(["admin"])),
                middleware::role_gate,
            )),
        )
        .route(
            "/mixed",
            get(mixed).route_layer(axum::middleware::from_fn_with_state(
                Arc::new(RoleRequirement::any_of(["admin", "user"])),
                middleware::role_gate,
            )),
        )
}

/// Claims as the client sees them, including `iat`/`exp`.
fn claims_json(identity: &CurrentIdentity) -> Value {
    let mut value = serde_json::to_value(identity.claims()).unwrap_or_else(|_| json!({}));
    if let Some(map) = value.as_object_mut() {
        map.insert("iat".to_string(), json!(identity.issued_at().timestamp()));
        map.insert("exp".to_string(), json!(identity.expires_at().timestamp()));
    }
    value
}

pub async fn protected(identity: CurrentIdentity) -> impl IntoResponse {
    Json(json!({
        "message": "You accessed a protected route!",
        "user": claims_json(&identity),
    }))
}

pub async fn user(identity: CurrentIdentity) -> String {
    format!(
        "Hello, {}! This is a protected route for all users.",
        identity.display_name()
    )
}

pub async fn admin(identity: CurrentIdentity) -> String {
    format!("Hello, {}! This is an admin-only route.", identity.display_name())
}

pub async fn mixed(identity: CurrentIdentity) -> String {
    format!(
        "Hello, {}! This is accessible to both admins and users.",
        identity.display_name()
    )
}

pub async fn whoami(identity: CurrentIdentity) -> impl IntoResponse {
    Json(json!({
        "sub": identity.subject(),
        "role": identity.role().map(|r| r.as_str()),
        "issued_at": identity.issued_at().to_rfc3339(),
        "expires_at": identity.expires_at().to_rfc3339(),
        "claims": claims_json(&identity),
    }))
}
