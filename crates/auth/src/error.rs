//! Error taxonomy for the auth boundary.

use thiserror::Error;

/// Rejection of a request by the access guard or the role gate.
///
/// Variants are listed in evaluation order: the first failing check wins.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthError {
    /// No `Authorization` value, or one not shaped as `Bearer <token>`.
    #[error("no bearer credential presented")]
    MissingCredential,

    /// The token is malformed or its signature does not verify.
    #[error("credential is invalid")]
    InvalidCredential,

    /// The signature verifies but the expiry instant has passed.
    #[error("credential has expired")]
    ExpiredCredential,

    /// A verified identity lacks every role the operation accepts.
    #[error("insufficient role for this operation")]
    InsufficientRole,
}

impl AuthError {
    /// Stable, machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidCredential => "invalid_credential",
            Self::ExpiredCredential => "expired_credential",
            Self::InsufficientRole => "insufficient_role",
        }
    }

    /// `true` when the caller is known but not allowed (forbidden),
    /// `false` when the caller could not be authenticated (unauthorized).
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::InsufficientRole)
    }
}

/// Failure to mint a token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IssueError {
    #[error("token lifetime must be positive")]
    NonPositiveTtl,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("signing secret must not be empty")]
    Empty,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("invalid password hash format: {0}")]
    MalformedHash(String),
}
