use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use common_security::AccessPolicy;

pub mod handlers;
pub mod store;

pub use store::{Customer, CustomerStore};

/// Guests are blocked outright; `customer-manager` sees every record;
/// everyone else is scoped to records owned by their own email.
pub const CUSTOMER_ACCESS: AccessPolicy = AccessPolicy::new(&["guest"], &["customer-manager"]);

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CustomerStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/customers/health", get(handlers::health))
        .route("/customers", get(handlers::list_customers))
        .route("/customers/:id", get(handlers::get_customer))
        .with_state(state)
}
