use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Structural credential problems only. None of these variants implies a
/// cryptographically invalid token; signature verification happens at the
/// edge proxy before a request ever reaches us.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header malformed")]
    InvalidAuthorization,
    #[error("token must have exactly three dot-separated segments")]
    MalformedToken,
    #[error("failed to decode token payload: {0}")]
    InvalidEncoding(String),
    #[error("token payload has no usable email claim")]
    MissingClaim,
    #[error("invalid role name '{0}': role names must not contain whitespace or commas")]
    InvalidRoleName(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::MissingAuthorization | AuthError::InvalidAuthorization => {
                (StatusCode::UNAUTHORIZED, "AUTH_HEADER")
            }
            AuthError::MalformedToken
            | AuthError::InvalidEncoding(_)
            | AuthError::MissingClaim => (StatusCode::UNAUTHORIZED, "AUTH_TOKEN"),
            // Seed/config defect, not a caller problem.
            AuthError::InvalidRoleName(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ROLES"),
        };

        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
