//! `tokengate-auth`: stateless bearer-token authentication and role gating.
//!
//! This crate is intentionally decoupled from HTTP and storage. It provides:
//! - the credential issuer ([`issue`], [`issue_at`]),
//! - the access guard ([`authenticate`], [`authenticate_with`]),
//! - the role gate ([`authorize`]),
//! - Argon2 password hashing for credential-checked logins.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod guard;
pub mod issuer;
pub mod jwt;
pub mod password;
pub mod roles;
pub mod secret;

pub use authorize::authorize;
pub use claims::{IdentityClaims, VerifiedIdentity};
pub use error::{AuthError, IssueError, PasswordError, SecretError};
pub use guard::{authenticate, authenticate_with, extract_bearer, TokenVerifier};
pub use issuer::{issue, issue_at, Token, TokenIssuer};
pub use jwt::Hs256Tokens;
pub use password::{hash_password, verify_password};
pub use roles::{Role, RoleRequirement};
pub use secret::SigningSecret;
