//! HS256 JSON Web Token codec backing the issuer and the guard.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{TokenClaims, validate_claims};
use crate::{
    AuthError, IdentityClaims, IssueError, SigningSecret, Token, TokenIssuer, TokenVerifier,
    VerifiedIdentity,
};

pub(crate) fn encoding_key(secret: &SigningSecret) -> EncodingKey {
    EncodingKey::from_secret(secret.as_bytes())
}

pub(crate) fn decoding_key(secret: &SigningSecret) -> DecodingKey {
    DecodingKey::from_secret(secret.as_bytes())
}

/// Validation pinned to HS256 with every time-based check disabled.
///
/// Expiry is enforced by [`validate_claims`] against the caller's `now`,
/// so the library must not consult its own clock or apply leeway.
pub(crate) fn hs256_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation
}

pub(crate) fn encode_hs256(
    claims: &IdentityClaims,
    key: &EncodingKey,
    ttl: Duration,
    issued_at: DateTime<Utc>,
) -> Result<Token, IssueError> {
    if ttl <= Duration::zero() {
        return Err(IssueError::NonPositiveTtl);
    }

    let iat = DateTime::<Utc>::from_timestamp(issued_at.timestamp(), 0)
        .ok_or_else(|| IssueError::Encoding("issued-at out of range".to_string()))?;
    let exp = iat
        .checked_add_signed(ttl)
        .ok_or_else(|| IssueError::Encoding("expiry out of range".to_string()))?;

    let payload = TokenClaims {
        identity: claims.clone(),
        iat,
        exp,
    };

    let raw = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, key)
        .map_err(|e| IssueError::Encoding(e.to_string()))?;

    tracing::debug!(sub = %claims.subject(), exp = %exp, "issued token");
    Ok(Token::new(raw))
}

pub(crate) fn decode_hs256(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
    now: DateTime<Utc>,
) -> Result<VerifiedIdentity, AuthError> {
    // Signature (constant-time compare) is checked before the payload is parsed.
    let data = jsonwebtoken::decode::<TokenClaims>(token, key, validation).map_err(|e| {
        tracing::debug!(reason = ?e.kind(), "token failed verification");
        AuthError::InvalidCredential
    })?;

    validate_claims(&data.claims, now)?;
    Ok(VerifiedIdentity::from_token(data.claims))
}

/// HS256 issuer/verifier bound to one signing secret.
///
/// Stateless after construction; share it behind an `Arc` across workers.
#[derive(Clone)]
pub struct Hs256Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Tokens {
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding: encoding_key(secret),
            decoding: decoding_key(secret),
            validation: hs256_validation(),
        }
    }
}

impl core::fmt::Debug for Hs256Tokens {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Tokens").finish_non_exhaustive()
    }
}

impl TokenIssuer for Hs256Tokens {
    fn issue_at(
        &self,
        claims: &IdentityClaims,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<Token, IssueError> {
        encode_hs256(claims, &self.encoding, ttl, issued_at)
    }
}

impl TokenVerifier for Hs256Tokens {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedIdentity, AuthError> {
        decode_hs256(token, &self.decoding, &self.validation, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn tokens(secret: &str) -> Hs256Tokens {
        Hs256Tokens::new(&SigningSecret::try_from(secret).unwrap())
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn issued_at_is_truncated_to_whole_seconds() {
        let codec = tokens("jwt-test");
        let issued_at = at(1_700_000_000) + Duration::milliseconds(750);
        let token = codec
            .issue_at(&IdentityClaims::new("alice"), Duration::seconds(10), issued_at)
            .unwrap();

        let identity = codec.verify(token.as_str(), at(1_700_000_000)).unwrap();
        assert_eq!(identity.issued_at(), at(1_700_000_000));
        assert_eq!(identity.expires_at(), at(1_700_000_010));
    }

    #[test]
    fn header_declares_hs256() {
        let token = tokens("jwt-test")
            .issue(&IdentityClaims::new("alice"), Duration::hours(1))
            .unwrap();
        let header = jsonwebtoken::decode_header(token.as_str()).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let secret = b"jwt-test";
        let payload = serde_json::json!({ "sub": "mallory", "iat": 0, "exp": i64::MAX / 2 });
        let raw = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &payload,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        assert_eq!(
            tokens("jwt-test").verify(&raw, at(10)),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn unsigned_tokens_are_rejected() {
        // {"alg":"none","typ":"JWT"} . {"sub":"mallory","iat":0,"exp":9999999999} .
        let raw = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                   eyJzdWIiOiJtYWxsb3J5IiwiaWF0IjowLCJleHAiOjk5OTk5OTk5OTl9.";
        assert_eq!(
            tokens("jwt-test").verify(raw, at(10)),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn structurally_broken_tokens_are_invalid_not_panics() {
        let codec = tokens("jwt-test");
        for raw in ["", "abc", "a.b", "a.b.c", "a.b.c.d", "...", "!!!.@@@.###"] {
            assert_eq!(codec.verify(raw, at(10)), Err(AuthError::InvalidCredential), "{raw}");
        }
    }

    #[test]
    fn signed_payload_without_expiry_is_invalid() {
        let payload = serde_json::json!({ "sub": "alice", "iat": 0 });
        let raw = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(b"jwt-test"),
        )
        .unwrap();

        assert_eq!(
            tokens("jwt-test").verify(&raw, at(10)),
            Err(AuthError::InvalidCredential)
        );
    }
}
