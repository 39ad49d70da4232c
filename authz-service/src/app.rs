use std::sync::Arc;

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{health, invalidate_cache, lookup_roles, metrics};
use crate::metrics::AuthzMetrics;
use crate::resolver::RoleResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RoleResolver>,
    pub metrics: Arc<AuthzMetrics>,
}

pub fn router(state: AppState) -> Router {
    // The proxy may use GET or POST depending on the original request.
    Router::new()
        .route("/authz/health", get(health))
        .route("/authz/roles", get(lookup_roles).post(lookup_roles))
        .route("/authz/roles/*path", get(lookup_roles).post(lookup_roles))
        .route("/authz/cache/:email", delete(invalidate_cache))
        .route("/metrics", get(metrics))
        .with_state(state)
}
