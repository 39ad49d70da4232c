use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use tracing::debug;

use crate::claims::decode_payload;
use crate::error::{AuthError, AuthResult};
use crate::principal::{AuthenticatedPrincipal, PrincipalSource};
use crate::roles::{RoleSet, ROLE_GUEST};

// Forwarded by the edge proxy after the external authorization pass.
// HTTP/2 header names are lowercase on the wire.
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_ROLES_HEADER: &str = "x-user-roles";

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;

        let roles = headers
            .get(USER_ROLES_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(RoleSet::parse_header)
            .unwrap_or_default();

        let forwarded_email = headers
            .get(USER_EMAIL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let Some(authorization) = headers.get(AUTHORIZATION) else {
            // No credential: acceptable only when the authorization service
            // explicitly tagged the request as guest traffic.
            if roles.contains(ROLE_GUEST) {
                debug!("guest request admitted via forwarded roles");
                return PrincipalSource::Headers {
                    email: forwarded_email,
                    roles,
                }
                .into_principal();
            }
            return Err(AuthError::MissingAuthorization);
        };

        // A presented token must decode; a broken one is rejected rather
        // than downgraded to guest.
        let token = parse_bearer(authorization)?;
        let claims = decode_payload(&token)?;

        let email = forwarded_email
            .filter(|value| !value.trim().is_empty())
            .or_else(|| {
                if claims.email.trim().is_empty() {
                    None
                } else {
                    Some(claims.email.clone())
                }
            });

        PrincipalSource::Headers { email, roles }.into_principal()
    }
}

pub fn parse_bearer(value: &axum::http::HeaderValue) -> AuthResult<String> {
    let raw = value
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorization)?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthorization)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthorization);
    }

    Ok(token.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parse_bearer_accepts_valid_token() {
        let header = HeaderValue::from_static("Bearer abc.def.ghi");
        let token = parse_bearer(&header).expect("token");
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn parse_bearer_rejects_wrong_scheme() {
        let header = HeaderValue::from_static("Basic credentials");
        let err = parse_bearer(&header).expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidAuthorization));
    }

    #[test]
    fn parse_bearer_rejects_empty_value() {
        let header = HeaderValue::from_static("Bearer    ");
        let err = parse_bearer(&header).expect_err("should reject empty token");
        assert!(matches!(err, AuthError::InvalidAuthorization));
    }
}
