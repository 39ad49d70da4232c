use std::collections::btree_set;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Sentinel assigned by the resolver to callers presenting no credential.
pub const ROLE_GUEST: &str = "guest";
/// Sentinel assigned when a valid identity has no entry in the role store.
pub const ROLE_UNVERIFIED: &str = "unverified";

/// Set of role names granted to an identity. Order-irrelevant; the
/// comma-separated header form is the only serialization that leaves
/// the process, so role names must stay free of commas and whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(role: &str) -> Self {
        Self(BTreeSet::from([role.to_string()]))
    }

    pub fn insert(&mut self, role: &str) {
        self.0.insert(role.to_string());
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn contains_any(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.0.contains(*role))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }

    /// Comma-separated, no surrounding or embedded whitespace
    /// (`user,customer-manager`). The edge proxy copies this value
    /// verbatim into the `x-user-roles` request header.
    pub fn to_header_value(&self) -> String {
        let mut out = String::new();
        for role in &self.0 {
            if !out.is_empty() {
                out.push(',');
            }
            out.push_str(role);
        }
        out
    }

    pub fn parse_header(value: &str) -> Self {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    }

    /// Rejects names that would corrupt the comma-separated wire form.
    pub fn validate_name(name: &str) -> AuthResult<()> {
        if name.is_empty() || name.contains(',') || name.chars().any(char::is_whitespace) {
            return Err(AuthError::InvalidRoleName(name.to_string()));
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
