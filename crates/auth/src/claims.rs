use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AuthError, Role};

/// Claim names owned by the token format itself.
pub const RESERVED_CLAIMS: [&str; 4] = ["sub", "role", "iat", "exp"];

/// Identity claims supplied by the login handler.
///
/// A flat mapping: the subject identifier, an optional role, and any further
/// scalar claims the caller wants echoed back to downstream handlers
/// (`username`, `email`, ...). The issuer treats them as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIdentityClaims")]
pub struct IdentityClaims {
    sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl IdentityClaims {
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            role: None,
            extra: Map::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Attach an additional claim.
    ///
    /// Names in [`RESERVED_CLAIMS`] are ignored; use the dedicated
    /// constructors for `sub` and `role`.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if !RESERVED_CLAIMS.contains(&name.as_str()) {
            self.extra.insert(name, value.into());
        }
        self
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Deserialization shape of [`IdentityClaims`]; reserved names are dropped
/// from `extra` on the way in, same as [`IdentityClaims::with_claim`].
#[derive(Deserialize)]
struct RawIdentityClaims {
    sub: String,

    #[serde(default)]
    role: Option<Role>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawIdentityClaims> for IdentityClaims {
    fn from(raw: RawIdentityClaims) -> Self {
        let mut extra = raw.extra;
        extra.retain(|name, _| !RESERVED_CLAIMS.contains(&name.as_str()));
        Self {
            sub: raw.sub,
            role: raw.role,
            extra,
        }
    }
}

/// Token payload as it travels on the wire: identity claims plus the
/// registered `iat`/`exp` instants (seconds since the Unix epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub identity: IdentityClaims,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

/// Deterministic expiry check: a token is usable strictly before `exp`.
///
/// Signature verification happens before this and is not repeated here.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), AuthError> {
    if now >= claims.exp {
        return Err(AuthError::ExpiredCredential);
    }
    Ok(())
}

/// Claims extracted from a verified, unexpired token.
///
/// Lives for the duration of one request; handlers and the role gate read it,
/// nothing writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    claims: IdentityClaims,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl VerifiedIdentity {
    pub(crate) fn from_token(claims: TokenClaims) -> Self {
        Self {
            claims: claims.identity,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }

    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    pub fn subject(&self) -> &str {
        self.claims.subject()
    }

    pub fn role(&self) -> Option<&Role> {
        self.claims.role()
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
