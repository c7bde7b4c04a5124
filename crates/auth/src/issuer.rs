//! Credential issuer: identity claims in, signed time-bounded token out.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::{IdentityClaims, IssueError, SigningSecret, jwt};

/// Compact signed token (`header.payload.signature`, base64url).
///
/// Immutable once minted. `Debug` is redacted so tokens do not end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub(crate) fn new(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Debug for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Something that can mint tokens for a set of identity claims.
pub trait TokenIssuer: Send + Sync {
    fn issue_at(
        &self,
        claims: &IdentityClaims,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<Token, IssueError>;

    fn issue(&self, claims: &IdentityClaims, ttl: Duration) -> Result<Token, IssueError> {
        self.issue_at(claims, ttl, Utc::now())
    }
}

/// Mint a token valid from now until `now + ttl`.
pub fn issue(
    claims: &IdentityClaims,
    secret: &SigningSecret,
    ttl: Duration,
) -> Result<Token, IssueError> {
    issue_at(claims, secret, ttl, Utc::now())
}

/// Mint a token with an explicit issued-at instant.
///
/// `issued_at` is truncated to whole seconds; the expiry is
/// `issued_at + ttl` from that truncated instant.
pub fn issue_at(
    claims: &IdentityClaims,
    secret: &SigningSecret,
    ttl: Duration,
    issued_at: DateTime<Utc>,
) -> Result<Token, IssueError> {
    jwt::encode_hs256(claims, &jwt::encoding_key(secret), ttl, issued_at)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn secret() -> SigningSecret {
        SigningSecret::try_from("issuer-test-secret").unwrap()
    }

    #[test]
    fn token_has_three_url_safe_segments() {
        let token = issue(&IdentityClaims::new("alice"), &secret(), Duration::hours(1)).unwrap();
        let parts: Vec<&str> = token.as_str().split('.').collect();

        assert_eq!(parts.len(), 3);
        for part in parts {
            assert!(!part.is_empty());
            assert!(
                part.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            );
        }
    }

    #[test]
    fn issuance_is_deterministic_for_a_fixed_instant() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = IdentityClaims::new("alice").with_role("admin");

        let a = issue_at(&claims, &secret(), Duration::hours(1), at).unwrap();
        let b = issue_at(&claims, &secret(), Duration::hours(1), at).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let claims = IdentityClaims::new("alice");
        assert_eq!(
            issue(&claims, &secret(), Duration::zero()),
            Err(IssueError::NonPositiveTtl)
        );
        assert_eq!(
            issue(&claims, &secret(), Duration::seconds(-5)),
            Err(IssueError::NonPositiveTtl)
        );
    }

    #[test]
    fn debug_redacts_token() {
        let token = issue(&IdentityClaims::new("alice"), &secret(), Duration::hours(1)).unwrap();
        assert_eq!(format!("{token:?}"), "Token(<redacted>)");
    }
}
