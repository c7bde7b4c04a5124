use serde::{Deserialize, Serialize};

use tokengate_auth::Role;
use tokengate_users::{ReplaceUser, UserPatch};

// -------------------------
// Auth
// -------------------------

/// Role-based login: the caller states who they are and which role they act in.
///
/// Fields are optional so that absence is reported as a validation error
/// rather than a body-shape error.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub role: Option<String>,
}

/// Credential-checked login against the user repository.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// -------------------------
// Users
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceUserRequest {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
}

impl From<ReplaceUserRequest> for ReplaceUser {
    fn from(value: ReplaceUserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            role: value.role,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PatchUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl From<PatchUserRequest> for UserPatch {
    fn from(value: PatchUserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            role: value.role,
        }
    }
}

/// Trimmed, non-empty string or `None`.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
