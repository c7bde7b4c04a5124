use crate::{AuthError, RoleRequirement, VerifiedIdentity};

/// Role gate for an already authenticated identity.
///
/// - No IO
/// - No panics
/// - Only called after the guard admitted the request
///
/// An empty requirement admits everyone; otherwise the identity's `role`
/// claim must be one of the required roles.
pub fn authorize(identity: &VerifiedIdentity, required: &RoleRequirement) -> Result<(), AuthError> {
    if required.admits(identity.role()) {
        Ok(())
    } else {
        tracing::debug!(
            sub = %identity.subject(),
            role = ?identity.role().map(|r| r.as_str()),
            required = %required,
            "role gate denied"
        );
        Err(AuthError::InsufficientRole)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;
    use crate::{IdentityClaims, SigningSecret, authenticate, issue_at};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn verified(claims: IdentityClaims) -> VerifiedIdentity {
        let secret = SigningSecret::try_from("authorize-test").unwrap();
        let token = issue_at(&claims, &secret, Duration::hours(1), at(1_000)).unwrap();
        let header = format!("Bearer {}", token.as_str());
        authenticate(Some(&header), &secret, at(1_001)).unwrap()
    }

    #[test]
    fn admin_route_admits_admin() {
        let identity = verified(IdentityClaims::new("alice").with_role("admin"));
        assert_eq!(authorize(&identity, &RoleRequirement::any_of(["admin"])), Ok(()));
    }

    #[test]
    fn admin_route_rejects_user() {
        let identity = verified(IdentityClaims::new("bob").with_role("user"));
        assert_eq!(
            authorize(&identity, &RoleRequirement::any_of(["admin"])),
            Err(AuthError::InsufficientRole)
        );
    }

    #[test]
    fn mixed_route_admits_both_roles() {
        let mixed = RoleRequirement::any_of(["admin", "user"]);
        for role in ["admin", "user"] {
            let identity = verified(IdentityClaims::new("x").with_role(role));
            assert_eq!(authorize(&identity, &mixed), Ok(()));
        }
    }

    #[test]
    fn roleless_identity_passes_only_open_requirement() {
        let identity = verified(IdentityClaims::new("testuser").with_claim("id", 1));
        assert_eq!(authorize(&identity, &RoleRequirement::any()), Ok(()));
        assert_eq!(
            authorize(&identity, &RoleRequirement::any_of(["user"])),
            Err(AuthError::InsufficientRole)
        );
    }

    proptest! {
        /// Property: the gate admits iff the role is listed, or nothing is listed.
        #[test]
        fn admits_iff_member(
            role in "[a-c]{1,2}",
            required in prop::collection::btree_set("[a-c]{1,2}", 0..4),
        ) {
            let identity = verified(IdentityClaims::new("p").with_role(role.clone()));
            let requirement = RoleRequirement::any_of(required.iter().cloned());

            let expected = required.is_empty() || required.contains(&role);
            prop_assert_eq!(authorize(&identity, &requirement).is_ok(), expected);
        }
    }
}
