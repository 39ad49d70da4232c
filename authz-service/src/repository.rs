use std::collections::HashMap;

use async_trait::async_trait;
use common_auth::{AuthResult, Identity, RoleSet};
use thiserror::Error;

/// Explicit lookup outcome: an identity with no stored roles is a normal
/// result, never an error, so the resolver is forced to handle it apart
/// from store failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleLookup {
    Found(RoleSet),
    NotFound,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Backing store unreachable or timed out. Propagated so callers can
    /// fail closed instead of silently handing out a default role set.
    #[error("role store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn lookup(&self, identity: &Identity) -> Result<RoleLookup, RepositoryError>;
}

/// In-memory store keyed by normalized identity, loaded from a seed
/// mapping. Stands in for the durable role table; lookups behave the
/// same way a keyed SELECT would.
pub struct SeedRoleRepository {
    entries: HashMap<String, RoleSet>,
}

impl SeedRoleRepository {
    pub fn from_pairs<'a, I>(pairs: I) -> AuthResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        let mut entries = HashMap::new();
        for (email, roles) in pairs {
            for role in roles {
                RoleSet::validate_name(role)?;
            }
            let identity = Identity::normalize(email);
            entries.insert(identity.as_str().to_owned(), roles.iter().copied().collect());
        }
        Ok(Self { entries })
    }

    /// Development seed matching the fixture accounts the stack is
    /// exercised with end to end.
    pub fn with_default_seed() -> Self {
        Self::from_pairs([
            ("test.user-vrfd@example.com", ["verified-user"].as_slice()),
            ("test.user@example.com", ["user"].as_slice()),
            ("test.user-cm@example.com", ["user", "customer-manager"].as_slice()),
            ("test.user-pm@example.com", ["user", "product-manager"].as_slice()),
            (
                "test.user-pcm@example.com",
                ["user", "product-category-manager"].as_slice(),
            ),
            ("admin.user@example.com", ["user", "admin"].as_slice()),
        ])
        .expect("default seed contains only valid role names")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RoleRepository for SeedRoleRepository {
    async fn lookup(&self, identity: &Identity) -> Result<RoleLookup, RepositoryError> {
        match self.entries.get(identity.as_str()) {
            Some(roles) => Ok(RoleLookup::Found(roles.clone())),
            None => Ok(RoleLookup::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_is_case_insensitive_on_the_key() {
        let repo = SeedRoleRepository::with_default_seed();
        let outcome = repo
            .lookup(&Identity::normalize("Admin.User@EXAMPLE.com"))
            .await
            .expect("lookup");
        let RoleLookup::Found(roles) = outcome else {
            panic!("expected roles for seeded identity");
        };
        assert!(roles.contains("admin"));
        assert!(roles.contains("user"));
    }

    #[tokio::test]
    async fn unknown_identity_is_not_found_not_an_error() {
        let repo = SeedRoleRepository::with_default_seed();
        let outcome = repo
            .lookup(&Identity::normalize("unknown@example.com"))
            .await
            .expect("lookup");
        assert_eq!(outcome, RoleLookup::NotFound);
    }

    #[test]
    fn seed_rejects_role_names_with_whitespace() {
        let result = SeedRoleRepository::from_pairs([("a@example.com", ["bad role"].as_slice())]);
        assert!(result.is_err());
    }
}
