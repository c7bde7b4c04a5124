//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared collaborators handed to handlers (repository, issuer)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use tokengate_auth::Hs256Tokens;
use tokengate_users::UserRepository;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig, users: Arc<dyn UserRepository>) -> Router {
    let tokens = Arc::new(Hs256Tokens::new(&config.jwt_secret));
    let auth_state = middleware::AuthState {
        verifier: tokens.clone(),
    };

    let services = Arc::new(services::AppServices {
        users,
        issuer: tokens,
        token_ttl: config.token_ttl,
    });

    // Protected routes: the guard runs before any per-route role gate.
    let protected = routes::protected::router().route_layer(
        axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware),
    );

    Router::new()
        .route("/", get(routes::system::root))
        .route("/health", get(routes::system::health))
        .route("/public", get(routes::system::public))
        .nest("/auth", routes::auth::router())
        .nest("/users", routes::users::router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
