use serde::Serialize;

use tokengate_auth::Role;
use tokengate_core::{DomainError, DomainResult, UserId};

/// A stored user record.
///
/// The password hash never leaves the process: it is skipped on serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(skip)]
    pub password_hash: Option<String>,
}

impl User {
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Input for creating a user; the id is assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: None,
            password_hash: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }
}

/// Full replacement of a user's profile fields (PUT semantics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceUser {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
}

/// Partial update (PATCH semantics): only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

pub(crate) fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name must not be empty"));
    }
    Ok(name.to_string())
}

/// Basic shape check plus normalisation (trimmed, lower-case).
pub(crate) fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: UserId::new(1),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Some(Role::new("admin")),
            password_hash: Some("$argon2id$secret".to_string()),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "Alice",
                "email": "alice@example.com",
                "role": "admin",
            })
        );
    }

    #[test]
    fn email_is_normalised() {
        assert_eq!(normalize_email("  Alice@Example.COM ").unwrap(), "alice@example.com");
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("   ").is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(validate_name(" \t").is_err());
        assert_eq!(validate_name(" Bob ").unwrap(), "Bob");
    }
}
