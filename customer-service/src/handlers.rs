use axum::extract::{Path, State};
use axum::Json;
use common_auth::AuthenticatedPrincipal;
use common_http_errors::ApiResult;
use common_security::{authorize_collection, authorize_record};
use serde_json::json;
use tracing::info;

use crate::store::Customer;
use crate::{AppState, CUSTOMER_ACCESS};

/// Collection fetch: managers see everyone, other callers only the
/// records they own, guests nothing at all.
pub async fn list_customers(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
) -> ApiResult<Json<Vec<Customer>>> {
    info!(
        identity = %principal.identity,
        roles = %principal.roles.to_header_value(),
        "listing customers"
    );
    let visible = authorize_collection(&principal, &CUSTOMER_ACCESS, state.store.all())?;
    info!(count = visible.len(), "returning customer list");
    Ok(Json(visible))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    principal: AuthenticatedPrincipal,
) -> ApiResult<Json<Customer>> {
    info!(identity = %principal.identity, id, "fetching customer");
    let customer = authorize_record(&principal, &CUSTOMER_ACCESS, state.store.by_id(id))?;
    Ok(Json(customer))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "customer-service" }))
}
