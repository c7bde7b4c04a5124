use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Response};

use tokengate_auth::{AuthError, VerifiedIdentity};

use crate::app::errors;

/// Verified identity for the current request.
///
/// Inserted by [`crate::middleware::auth_middleware`]; dropped with the
/// request. Extracting it on a route without the guard is a wiring bug and
/// answers as if no credential had been presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentIdentity(pub VerifiedIdentity);

impl CurrentIdentity {
    /// Name used in greetings: the `username` claim, else the subject.
    pub fn display_name(&self) -> &str {
        self.0
            .claims()
            .claim("username")
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| self.0.subject())
    }
}

impl core::ops::Deref for CurrentIdentity {
    type Target = VerifiedIdentity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| errors::auth_error_to_response(AuthError::MissingCredential))
    }
}
