use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokengate_auth::hash_password;
use tokengate_core::{DomainError, DomainResult, UserId};

use crate::user::{NewUser, ReplaceUser, User, UserPatch, normalize_email, validate_name};

pub const SEED_LOGIN_EMAIL: &str = "test@example.com";
pub const SEED_LOGIN_PASSWORD: &str = "123456";

/// Keyed user storage injected into the HTTP layer.
///
/// Every lookup states its outcome explicitly: `get`/`find_by_email` return
/// `None` for a missing record, mutations return `DomainError::NotFound`.
pub trait UserRepository: Send + Sync {
    fn get(&self, id: UserId) -> Option<User>;
    /// All users in ascending id order.
    fn list(&self) -> Vec<User>;
    fn insert(&self, new: NewUser) -> DomainResult<User>;
    fn replace(&self, id: UserId, with: ReplaceUser) -> DomainResult<User>;
    fn patch(&self, id: UserId, patch: UserPatch) -> DomainResult<User>;
    /// Remove a user, returning the removed record.
    fn delete(&self, id: UserId) -> DomainResult<User>;
    fn find_by_email(&self, email: &str) -> Option<User>;
}

#[derive(Debug)]
struct Inner {
    next_id: u64,
    users: BTreeMap<UserId, User>,
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory repository for dev/tests.
///
/// Ids come from a monotonic counter and are never reused after a delete.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    inner: RwLock<Inner>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                users: BTreeMap::new(),
            }),
        }
    }

    /// Repository pre-populated with the demo users.
    ///
    /// Alice, Bob and Charlie have no password. `test@example.com` can log in
    /// through the password flow with `123456`.
    pub fn seeded() -> Self {
        let repo = Self::new();
        for (name, email) in [
            ("Alice", "alice@example.com"),
            ("Bob", "bob@example.com"),
            ("Charlie", "charlie@example.com"),
        ] {
            if let Err(e) = repo.insert(NewUser::new(name, email)) {
                tracing::warn!(error = %e, email, "failed to seed demo user");
            }
        }

        let seeded_login = hash_password(SEED_LOGIN_PASSWORD)
            .map_err(|e| e.to_string())
            .and_then(|hash| {
                repo.insert(NewUser::new("Test", SEED_LOGIN_EMAIL).with_password_hash(hash))
                    .map_err(|e| e.to_string())
            });
        if let Err(error) = seeded_login {
            tracing::warn!(%error, email = SEED_LOGIN_EMAIL, "failed to seed login user");
        }

        repo
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn get(&self, id: UserId) -> Option<User> {
        self.read().users.get(&id).cloned()
    }

    fn list(&self) -> Vec<User> {
        self.read().users.values().cloned().collect()
    }

    fn insert(&self, new: NewUser) -> DomainResult<User> {
        let name = validate_name(&new.name)?;
        let email = normalize_email(&new.email)?;

        let mut inner = self.write();
        if inner.email_taken(&email, None) {
            return Err(DomainError::conflict(format!("email '{email}' already in use")));
        }

        let id = UserId::new(inner.next_id);
        inner.next_id += 1;

        let user = User {
            id,
            name,
            email,
            role: new.role,
            password_hash: new.password_hash,
        };
        inner.users.insert(id, user.clone());

        tracing::debug!(user_id = %id, "user created");
        Ok(user)
    }

    fn replace(&self, id: UserId, with: ReplaceUser) -> DomainResult<User> {
        let name = validate_name(&with.name)?;
        let email = normalize_email(&with.email)?;

        let mut inner = self.write();
        if !inner.users.contains_key(&id) {
            return Err(DomainError::not_found());
        }
        if inner.email_taken(&email, Some(id)) {
            return Err(DomainError::conflict(format!("email '{email}' already in use")));
        }

        let user = inner.users.get_mut(&id).ok_or_else(DomainError::not_found)?;
        user.name = name;
        user.email = email;
        user.role = with.role;

        Ok(user.clone())
    }

    fn patch(&self, id: UserId, patch: UserPatch) -> DomainResult<User> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let email = patch.email.as_deref().map(normalize_email).transpose()?;

        let mut inner = self.write();
        if !inner.users.contains_key(&id) {
            return Err(DomainError::not_found());
        }
        if let Some(email) = &email {
            if inner.email_taken(email, Some(id)) {
                return Err(DomainError::conflict(format!("email '{email}' already in use")));
            }
        }

        let user = inner.users.get_mut(&id).ok_or_else(DomainError::not_found)?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(role) = patch.role {
            user.role = Some(role);
        }

        Ok(user.clone())
    }

    fn delete(&self, id: UserId) -> DomainResult<User> {
        let removed = self.write().users.remove(&id).ok_or_else(DomainError::not_found)?;
        tracing::debug!(user_id = %id, "user deleted");
        Ok(removed)
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim().to_lowercase();
        self.read().users.values().find(|u| u.email == email).cloned()
    }
}

#[cfg(test)]
mod tests {
    use tokengate_auth::Role;

    use super::*;

    #[test]
    fn seeded_repository_has_demo_users_in_order() {
        let repo = InMemoryUserRepository::seeded();
        let names: Vec<String> = repo.list().into_iter().map(|u| u.name).collect();
        assert_eq!(names, ["Alice", "Bob", "Charlie", "Test"]);
        assert_eq!(repo.get(UserId::new(2)).unwrap().email, "bob@example.com");
        assert!(!repo.get(UserId::new(1)).unwrap().has_password());
    }

    #[test]
    fn seeded_login_user_has_a_verifiable_password() {
        let repo = InMemoryUserRepository::seeded();
        let user = repo.find_by_email(SEED_LOGIN_EMAIL).unwrap();
        let hash = user.password_hash.unwrap();

        assert!(tokengate_auth::verify_password(SEED_LOGIN_PASSWORD, &hash).unwrap());
        assert!(!tokengate_auth::verify_password("654321", &hash).unwrap());
    }

    #[test]
    fn get_missing_is_none() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(repo.get(UserId::new(99)), None);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();
        let a = repo.insert(NewUser::new("A", "a@example.com")).unwrap();
        let b = repo.insert(NewUser::new("B", "b@example.com")).unwrap();
        repo.delete(a.id).unwrap();

        let c = repo.insert(NewUser::new("C", "c@example.com")).unwrap();
        assert_eq!(b.id, UserId::new(2));
        assert_eq!(c.id, UserId::new(3));
        assert_eq!(repo.list().len(), 2);
    }

    #[test]
    fn duplicate_email_conflicts_case_insensitively() {
        let repo = InMemoryUserRepository::new();
        repo.insert(NewUser::new("A", "a@example.com")).unwrap();

        let err = repo.insert(NewUser::new("A2", "A@Example.com")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn replace_overwrites_profile_but_keeps_password() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .insert(
                NewUser::new("Rahul", "r@gmail.com")
                    .with_role("admin")
                    .with_password_hash("$argon2id$x"),
            )
            .unwrap();

        let replaced = repo
            .replace(
                user.id,
                ReplaceUser {
                    name: "Ravi".to_string(),
                    email: "ravi@gmail.com".to_string(),
                    role: None,
                },
            )
            .unwrap();

        assert_eq!(replaced.name, "Ravi");
        assert_eq!(replaced.email, "ravi@gmail.com");
        assert_eq!(replaced.role, None);
        assert!(replaced.has_password());
    }

    #[test]
    fn patch_touches_only_given_fields() {
        let repo = InMemoryUserRepository::seeded();
        let patched = repo
            .patch(
                UserId::new(1),
                UserPatch {
                    email: Some("alice@new.example".to_string()),
                    ..UserPatch::default()
                },
            )
            .unwrap();

        assert_eq!(patched.name, "Alice");
        assert_eq!(patched.email, "alice@new.example");

        let promoted = repo
            .patch(
                UserId::new(1),
                UserPatch {
                    role: Some(Role::new("admin")),
                    ..UserPatch::default()
                },
            )
            .unwrap();
        assert_eq!(promoted.role, Some(Role::new("admin")));
        assert_eq!(promoted.email, "alice@new.example");
    }

    #[test]
    fn patch_to_own_email_is_not_a_conflict() {
        let repo = InMemoryUserRepository::seeded();
        let result = repo.patch(
            UserId::new(1),
            UserPatch {
                email: Some("ALICE@example.com".to_string()),
                ..UserPatch::default()
            },
        );
        assert!(result.is_ok());
    }

    #[test]
    fn mutations_on_missing_ids_are_not_found() {
        let repo = InMemoryUserRepository::seeded();
        let missing = UserId::new(999);

        assert_eq!(repo.delete(missing), Err(DomainError::NotFound));
        assert_eq!(
            repo.patch(missing, UserPatch::default()),
            Err(DomainError::NotFound)
        );
        assert_eq!(
            repo.replace(
                missing,
                ReplaceUser {
                    name: "X".to_string(),
                    email: "x@example.com".to_string(),
                    role: None,
                }
            ),
            Err(DomainError::NotFound)
        );
    }

    #[test]
    fn invalid_input_is_rejected_before_lookup() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.insert(NewUser::new("", "a@example.com")),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            repo.insert(NewUser::new("A", "nope")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn find_by_email_normalises_the_query() {
        let repo = InMemoryUserRepository::seeded();
        let found = repo.find_by_email(" BOB@example.com ").unwrap();
        assert_eq!(found.name, "Bob");
        assert!(repo.find_by_email("nobody@example.com").is_none());
    }
}
