use common_http_errors::ApiError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecurityError {
    /// Access denied. Also covers a missing record for non-manager
    /// callers so a denial never reveals whether the record exists.
    #[error("access denied")]
    Forbidden,
    /// Record absent; only ever returned to manager-level callers.
    #[error("record not found")]
    NotFound,
}

impl From<SecurityError> for ApiError {
    fn from(value: SecurityError) -> Self {
        match value {
            SecurityError::Forbidden => ApiError::Forbidden { trace_id: None },
            SecurityError::NotFound => ApiError::NotFound { code: "record_not_found", trace_id: None },
        }
    }
}
