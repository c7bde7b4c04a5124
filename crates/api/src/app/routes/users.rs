//! In-memory user CRUD over the injected repository.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use tokengate_auth::hash_password;
use tokengate_core::{DomainError, UserId};
use tokengate_users::NewUser;

use crate::app::{dto, errors, services::AppServices};

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/:id",
            get(get_user)
                .put(replace_user)
                .patch(patch_user)
                .delete(delete_user),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /users
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    (StatusCode::OK, Json(services.users.list())).into_response()
}

/// GET /users/:id
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users.get(id) {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => user_error(DomainError::NotFound),
    }
}

/// POST /users
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let mut new = NewUser::new(body.name, body.email);
    new.role = body.role;

    if let Some(password) = body.password {
        if password.is_empty() {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "password must not be empty",
            );
        }
        match tokio::task::spawn_blocking(move || hash_password(&password)).await {
            Ok(Ok(hash)) => new = new.with_password_hash(hash),
            Ok(Err(e)) => return errors::password_error_to_response(e),
            Err(e) => return errors::internal_error(e),
        }
    }

    match services.users.insert(new) {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => user_error(e),
    }
}

/// PUT /users/:id - full replacement of the profile fields.
pub async fn replace_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::ReplaceUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.users.replace(id, body.into()) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => user_error(e),
    }
}

/// PATCH /users/:id - update only the fields present in the body.
pub async fn patch_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::PatchUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.users.patch(id, body.into()) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => user_error(e),
    }
}

/// DELETE /users/:id
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users.delete(id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => user_error(e),
    }
}

fn parse_id(raw: &str) -> Result<UserId, axum::response::Response> {
    raw.parse::<UserId>().map_err(errors::domain_error_to_response)
}

fn user_error(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => errors::json_error(StatusCode::NOT_FOUND, "not_found", "User not found"),
        other => errors::domain_error_to_response(other),
    }
}
