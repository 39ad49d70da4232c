use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::error::{AuthError, AuthResult};
use crate::identity::Identity;

/// Identity-bearing claims from the middle segment of a bearer token.
///
/// The edge proxy has already verified the signature; everything here is
/// pure payload decoding, so a failure only ever means the upstream sent
/// us something structurally broken.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
}

impl IdentityClaims {
    pub fn identity(&self) -> AuthResult<Identity> {
        if self.email.trim().is_empty() {
            return Err(AuthError::MissingClaim);
        }
        Ok(Identity::normalize(&self.email))
    }
}

/// Decodes the payload segment of a three-segment bearer token.
pub fn decode_payload(token: &str) -> AuthResult<IdentityClaims> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(AuthError::MalformedToken),
    };

    // Issuers emit unpadded base64url; tolerate padded input as well.
    let trimmed = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|err| AuthError::InvalidEncoding(err.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|err| AuthError::InvalidEncoding(err.to_string()))
}

/// Extracts the normalized identity from a bearer token in one step.
pub fn extract_identity(token: &str) -> AuthResult<Identity> {
    decode_payload(token)?.identity()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

    fn token_with_payload(payload: &str) -> String {
        format!("hdr.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn extracts_and_normalizes_email() {
        let token = token_with_payload(r#"{"email":"Admin.User@Example.com","sub":"abc"}"#);
        let identity = extract_identity(&token).expect("identity");
        assert_eq!(identity.as_str(), "admin.user@example.com");
    }

    #[test]
    fn accepts_padded_payload_segment() {
        let token = format!("hdr.{}.sig", URL_SAFE.encode(r#"{"email":"a@example.com"}"#));
        let identity = extract_identity(&token).expect("identity");
        assert_eq!(identity.as_str(), "a@example.com");
    }

    #[test]
    fn rejects_wrong_segment_count() {
        let err = extract_identity("onlyone.two").expect_err("should reject");
        assert!(matches!(err, AuthError::MalformedToken));
        let err = extract_identity("a.b.c.d").expect_err("should reject");
        assert!(matches!(err, AuthError::MalformedToken));
    }

    #[test]
    fn rejects_bad_base64() {
        let err = extract_identity("hdr.!!not-base64!!.sig").expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidEncoding(_)));
    }

    #[test]
    fn rejects_non_json_payload() {
        let token = format!("hdr.{}.sig", URL_SAFE_NO_PAD.encode("plain text"));
        let err = extract_identity(&token).expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidEncoding(_)));
    }

    #[test]
    fn rejects_missing_or_empty_email() {
        let token = token_with_payload(r#"{"sub":"abc"}"#);
        assert!(matches!(
            extract_identity(&token),
            Err(AuthError::MissingClaim)
        ));

        let token = token_with_payload(r#"{"email":"   "}"#);
        assert!(matches!(
            extract_identity(&token),
            Err(AuthError::MissingClaim)
        ));
    }
}
