use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role identifier carried in the `role` claim.
///
/// Roles are opaque strings at this layer (e.g. `"admin"`, `"user"`); the
/// meaning of a role is decided by whoever registers a [`RoleRequirement`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Set of roles a protected operation accepts.
///
/// Built once when the operation is registered and never mutated afterwards.
/// An empty requirement admits every authenticated identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: BTreeSet<Role>,
}

impl RoleRequirement {
    /// Authentication only; no particular role.
    pub fn any() -> Self {
        Self::default()
    }

    /// Admit identities holding at least one of `roles`.
    pub fn any_of<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.roles.is_empty()
    }

    /// Membership test used by the role gate.
    pub fn admits(&self, role: Option<&Role>) -> bool {
        if self.is_open() {
            return true;
        }
        role.is_some_and(|r| self.roles.contains(r))
    }
}

impl core::fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_open() {
            return f.write_str("<any>");
        }
        let names: Vec<&str> = self.roles.iter().map(Role::as_str).collect();
        f.write_str(&names.join(","))
    }
}
