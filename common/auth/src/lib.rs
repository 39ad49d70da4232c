pub mod claims;
pub mod error;
pub mod extractors;
pub mod identity;
pub mod principal;
pub mod roles;

pub use claims::{decode_payload, extract_identity, IdentityClaims};
pub use error::{AuthError, AuthResult};
pub use extractors::{parse_bearer, USER_EMAIL_HEADER, USER_ROLES_HEADER};
pub use identity::Identity;
pub use principal::{AuthenticatedPrincipal, PrincipalSource};
pub use roles::{RoleSet, ROLE_GUEST, ROLE_UNVERIFIED};
