use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use axum::Json;
use common_auth::{extract_identity, parse_bearer, AuthError, Identity, RoleSet};
use common_http_errors::{ApiError, ApiResult};
use serde_json::json;
use tracing::{info, warn};

use crate::app::AppState;
use crate::repository::RepositoryError;

/// Role lookup called by the edge proxy's external-authorization filter.
///
/// The path suffix mirrors the original request path and is ignored
/// beyond logging; the proxy forwards whatever the client asked for.
pub async fn lookup_roles(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let request_id = headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");
    match &path {
        Some(Path(suffix)) => info!(request_id, path = %suffix, "authz role lookup"),
        None => info!(request_id, "authz role lookup"),
    }

    let Some(authorization) = headers.get(AUTHORIZATION) else {
        // No credential: the caller proceeds as guest and downstream
        // policies decide what guests may see.
        state.metrics.request("guest");
        let roles = state
            .resolver
            .resolve_principal(None)
            .await
            .map_err(|err| unavailable(err, request_id))?;
        return roles_response(&Identity::anonymous(), &roles);
    };

    state.metrics.request("authenticated");
    let token = parse_bearer(authorization).map_err(auth_rejection)?;
    let identity = extract_identity(&token).map_err(auth_rejection)?;

    let roles = state
        .resolver
        .resolve(&identity)
        .await
        .map_err(|err| unavailable(err, request_id))?;

    info!(request_id, %identity, roles = %roles.to_header_value(), "roles resolved");
    roles_response(&identity, &roles)
}

/// Drops the cached entry for one identity; used by admin tooling after
/// a role grant so the change lands before TTL expiry.
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Json<serde_json::Value> {
    let identity = Identity::normalize(&email);
    let invalidated = state.resolver.invalidate(&identity).await;
    info!(%identity, invalidated, "cache invalidation requested");
    Json(json!({ "identity": identity.as_str(), "invalidated": invalidated }))
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cache_healthy = state.resolver.cache_health().await;
    Json(json!({
        "status": "healthy",
        "service": "authz-service",
        "cache_enabled": state.resolver.cache_enabled(),
        "cache_healthy": cache_healthy,
    }))
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<Response> {
    state
        .metrics
        .render()
        .map_err(|err| ApiError::internal(err, None))
}

// Resolved roles travel back as response headers; the proxy copies them
// onto the downstream request verbatim.
fn roles_response(identity: &Identity, roles: &RoleSet) -> ApiResult<Response> {
    let email = HeaderValue::from_str(identity.as_str())
        .map_err(|err| ApiError::internal(err, None))?;
    let roles = HeaderValue::from_str(&roles.to_header_value())
        .map_err(|err| ApiError::internal(err, None))?;
    Response::builder()
        .status(StatusCode::OK)
        .header(common_auth::USER_EMAIL_HEADER, email)
        .header(common_auth::USER_ROLES_HEADER, roles)
        .body(Body::empty())
        .map_err(|err| ApiError::internal(err, None))
}

fn auth_rejection(err: AuthError) -> ApiError {
    let code = match err {
        AuthError::MissingAuthorization | AuthError::InvalidAuthorization => "auth_header",
        _ => "invalid_token",
    };
    ApiError::Unauthorized {
        code,
        trace_id: None,
        message: Some(err.to_string()),
    }
}

fn unavailable(err: RepositoryError, request_id: &str) -> ApiError {
    warn!(request_id, %err, "role resolution failed closed");
    ApiError::unavailable("role_store_unavailable", err, None)
}
