use crate::claims::IdentityClaims;
use crate::error::AuthResult;
use crate::identity::Identity;
use crate::roles::{RoleSet, ROLE_GUEST};

/// Where a request's identity and roles came from.
///
/// Every variant collapses into the same [`AuthenticatedPrincipal`] at the
/// request boundary, so handlers never care which path produced it.
#[derive(Debug, Clone)]
pub enum PrincipalSource {
    /// Decoded token plus the role set resolved for it.
    Jwt {
        claims: IdentityClaims,
        roles: RoleSet,
    },
    /// Proxy-forwarded `x-user-email` / `x-user-roles` headers. The email
    /// header wins over any claim in the token: the authorization service
    /// that populated it is the source of truth.
    Headers {
        email: Option<String>,
        roles: RoleSet,
    },
    /// No credential at all.
    Anonymous,
}

impl PrincipalSource {
    pub fn into_principal(self) -> AuthResult<AuthenticatedPrincipal> {
        match self {
            PrincipalSource::Jwt { claims, roles } => Ok(AuthenticatedPrincipal {
                identity: claims.identity()?,
                roles,
            }),
            PrincipalSource::Headers { email, roles } => {
                let identity = match email {
                    Some(value) if !value.trim().is_empty() => Identity::normalize(&value),
                    _ => Identity::anonymous(),
                };
                Ok(AuthenticatedPrincipal { identity, roles })
            }
            PrincipalSource::Anonymous => Ok(AuthenticatedPrincipal {
                identity: Identity::anonymous(),
                roles: RoleSet::single(ROLE_GUEST),
            }),
        }
    }
}

/// Per-request identity and role set; immutable once constructed.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    pub identity: Identity,
    pub roles: RoleSet,
}

impl AuthenticatedPrincipal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.roles.contains_any(roles)
    }

    pub fn is_anonymous(&self) -> bool {
        self.identity.is_empty()
    }
}
