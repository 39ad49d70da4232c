use common_auth::AuthenticatedPrincipal;
use tracing::{debug, warn};

use crate::error::SecurityError;

/// Declarative per-operation rule evaluated in fixed order: denial
/// first, manager grant second, ownership last.
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy {
    /// Roles that always block access, regardless of anything else.
    pub denied_roles: &'static [&'static str],
    /// Roles granted unrestricted access to all records.
    pub manager_roles: &'static [&'static str],
}

impl AccessPolicy {
    pub const fn new(
        denied_roles: &'static [&'static str],
        manager_roles: &'static [&'static str],
    ) -> Self {
        Self { denied_roles, manager_roles }
    }

    /// Everyone in, nobody elevated. Endpoints without ownership
    /// semantics pair this with [`ensure_allowed`].
    pub const OPEN: AccessPolicy = AccessPolicy::new(&[], &[]);
}

/// Seam between the decision engine and domain records: whichever field
/// identifies the record's owner, compared against the caller identity.
pub trait Owned {
    fn owner(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Denied,
    Unrestricted,
    OwnerOnly,
}

pub fn decide(principal: &AuthenticatedPrincipal, policy: &AccessPolicy) -> Decision {
    if principal.has_any_role(policy.denied_roles) {
        warn!(identity = %principal.identity, "access blocked by denied role");
        return Decision::Denied;
    }
    if principal.has_any_role(policy.manager_roles) {
        return Decision::Unrestricted;
    }
    Decision::OwnerOnly
}

/// Denial gate for endpoints that serve the same data to everyone the
/// policy lets in (no ownership partition).
pub fn ensure_allowed(
    principal: &AuthenticatedPrincipal,
    policy: &AccessPolicy,
) -> Result<(), SecurityError> {
    match decide(principal, policy) {
        Decision::Denied => Err(SecurityError::Forbidden),
        Decision::Unrestricted | Decision::OwnerOnly => Ok(()),
    }
}

/// Single-record authorization.
///
/// Managers learn whether the record exists; everyone else gets the same
/// `Forbidden` for a foreign record and a missing one, so probing for
/// record IDs leaks nothing.
pub fn authorize_record<T: Owned>(
    principal: &AuthenticatedPrincipal,
    policy: &AccessPolicy,
    record: Option<T>,
) -> Result<T, SecurityError> {
    match decide(principal, policy) {
        Decision::Denied => Err(SecurityError::Forbidden),
        Decision::Unrestricted => record.ok_or(SecurityError::NotFound),
        Decision::OwnerOnly => match record {
            Some(record) if principal.identity.matches(record.owner()) => Ok(record),
            _ => {
                debug!(identity = %principal.identity, "record withheld from non-manager");
                Err(SecurityError::Forbidden)
            }
        },
    }
}

/// Collection authorization: managers see the full set, owner-scoped
/// callers see only their own records.
pub fn authorize_collection<T: Owned>(
    principal: &AuthenticatedPrincipal,
    policy: &AccessPolicy,
    records: Vec<T>,
) -> Result<Vec<T>, SecurityError> {
    match decide(principal, policy) {
        Decision::Denied => Err(SecurityError::Forbidden),
        Decision::Unrestricted => Ok(records),
        Decision::OwnerOnly => Ok(records
            .into_iter()
            .filter(|record| principal.identity.matches(record.owner()))
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_auth::{Identity, RoleSet};

    const POLICY: AccessPolicy = AccessPolicy::new(&["guest"], &["customer-manager"]);

    #[derive(Debug)]
    struct Record {
        owner: &'static str,
    }

    impl Owned for Record {
        fn owner(&self) -> &str {
            self.owner
        }
    }

    fn principal(email: &str, roles: &[&str]) -> AuthenticatedPrincipal {
        AuthenticatedPrincipal {
            identity: Identity::normalize(email),
            roles: roles.iter().copied().collect::<RoleSet>(),
        }
    }

    #[test]
    fn denial_wins_over_manager_in_both_insertion_orders() {
        let p = principal("a@example.com", &["guest", "customer-manager"]);
        assert_eq!(decide(&p, &POLICY), Decision::Denied);

        let p = principal("a@example.com", &["customer-manager", "guest"]);
        assert_eq!(decide(&p, &POLICY), Decision::Denied);
    }

    #[test]
    fn manager_gets_unrestricted() {
        let p = principal("a@example.com", &["user", "customer-manager"]);
        assert_eq!(decide(&p, &POLICY), Decision::Unrestricted);
    }

    #[test]
    fn plain_user_is_owner_scoped() {
        let p = principal("a@example.com", &["user"]);
        assert_eq!(decide(&p, &POLICY), Decision::OwnerOnly);
    }

    #[test]
    fn open_policy_admits_guests() {
        let p = principal("", &["guest"]);
        assert!(ensure_allowed(&p, &AccessPolicy::OPEN).is_ok());
    }

    #[test]
    fn owner_can_fetch_own_record_case_insensitively() {
        let p = principal("A@Example.com", &["user"]);
        let record = authorize_record(&p, &POLICY, Some(Record { owner: "a@example.com" }));
        assert!(record.is_ok());
    }

    #[test]
    fn foreign_and_missing_records_are_indistinguishable_to_non_managers() {
        let p = principal("a@example.com", &["user"]);
        let foreign = authorize_record(&p, &POLICY, Some(Record { owner: "b@example.com" }));
        let missing = authorize_record::<Record>(&p, &POLICY, None);
        assert_eq!(foreign.unwrap_err(), SecurityError::Forbidden);
        assert_eq!(missing.unwrap_err(), SecurityError::Forbidden);
    }

    #[test]
    fn manager_sees_not_found_for_missing_record() {
        let p = principal("a@example.com", &["customer-manager"]);
        let missing = authorize_record::<Record>(&p, &POLICY, None);
        assert_eq!(missing.unwrap_err(), SecurityError::NotFound);
    }

    #[test]
    fn collection_filters_to_owned_records() {
        let p = principal("a@example.com", &["user"]);
        let records = vec![
            Record { owner: "A@example.com" },
            Record { owner: "b@example.com" },
            Record { owner: "a@example.com" },
        ];
        let visible = authorize_collection(&p, &POLICY, records).expect("allowed");
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|r| r.owner.eq_ignore_ascii_case("a@example.com")));
    }

    #[test]
    fn collection_unfiltered_for_manager() {
        let p = principal("a@example.com", &["customer-manager"]);
        let records = vec![
            Record { owner: "a@example.com" },
            Record { owner: "b@example.com" },
        ];
        let visible = authorize_collection(&p, &POLICY, records).expect("allowed");
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn denied_role_blocks_collection_entirely() {
        let p = principal("a@example.com", &["guest"]);
        let err = authorize_collection(&p, &POLICY, vec![Record { owner: "a@example.com" }]);
        assert_eq!(err.unwrap_err(), SecurityError::Forbidden);
    }
}
