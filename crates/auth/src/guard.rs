//! Access guard: turns a presented `Authorization` value into a verified identity.
//!
//! Evaluation order is fixed and first failure wins:
//! presentation format → signature → expiry.

use chrono::{DateTime, Utc};

use crate::{AuthError, SigningSecret, VerifiedIdentity, jwt};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Something that can verify a bare token string.
///
/// Implementations must be pure: verifying one token never affects another.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedIdentity, AuthError>;
}

/// Extract the token from a `Bearer <token>` presentation.
///
/// Exactly one space after the scheme, a non-empty token and no further
/// whitespace; anything else counts as no credential at all.
pub fn extract_bearer(presented: Option<&str>) -> Result<&str, AuthError> {
    let token = presented
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MissingCredential)?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::MissingCredential);
    }

    Ok(token)
}

/// Verify a presented credential against `secret` at instant `now`.
pub fn authenticate(
    presented: Option<&str>,
    secret: &SigningSecret,
    now: DateTime<Utc>,
) -> Result<VerifiedIdentity, AuthError> {
    let token = extract_bearer(presented)?;
    jwt::decode_hs256(
        token,
        &jwt::decoding_key(secret),
        &jwt::hs256_validation(),
        now,
    )
}

/// Same as [`authenticate`] but through a pre-built verifier.
pub fn authenticate_with<V>(
    verifier: &V,
    presented: Option<&str>,
    now: DateTime<Utc>,
) -> Result<VerifiedIdentity, AuthError>
where
    V: TokenVerifier + ?Sized,
{
    let token = extract_bearer(presented)?;
    verifier.verify(token, now)
}
