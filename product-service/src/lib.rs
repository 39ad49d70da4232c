use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use common_auth::AuthenticatedPrincipal;
use common_http_errors::{ApiError, ApiResult};
use common_security::{ensure_allowed, AccessPolicy};
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// The catalogue is public: every role, guest included, may browse it.
/// Principals still flow through the policy gate so the service stays
/// uniform with the rest of the stack.
pub const PRODUCT_ACCESS: AccessPolicy = AccessPolicy::OPEN;

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Minor units; floats have no place in prices.
    pub price_cents: u32,
    pub category: String,
}

pub struct ProductStore {
    products: Vec<Product>,
}

impl ProductStore {
    pub fn with_default_seed() -> Self {
        let seed = [
            (1, "Laptop", "15-inch developer laptop", 129_900, "electronics"),
            (2, "Mechanical Keyboard", "Tenkeyless, tactile switches", 8_950, "electronics"),
            (3, "Desk Chair", "Adjustable ergonomic chair", 24_999, "furniture"),
            (4, "Standing Desk", "Motorized sit-stand desk", 49_900, "furniture"),
            (5, "Monitor", "27-inch 4K display", 39_900, "electronics"),
        ];
        let products = seed
            .into_iter()
            .map(|(id, name, description, price_cents, category)| Product {
                id,
                name: name.to_string(),
                description: description.to_string(),
                price_cents,
                category: category.to_string(),
            })
            .collect();
        Self { products }
    }

    pub fn all(&self) -> Vec<Product> {
        self.products.clone()
    }

    pub fn by_id(&self, id: u32) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProductStore>,
}

pub async fn list_products(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
) -> ApiResult<Json<Vec<Product>>> {
    ensure_allowed(&principal, &PRODUCT_ACCESS)?;
    info!(identity = %principal.identity, "listing products");
    Ok(Json(state.store.all()))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    principal: AuthenticatedPrincipal,
) -> ApiResult<Json<Product>> {
    ensure_allowed(&principal, &PRODUCT_ACCESS)?;
    info!(identity = %principal.identity, id, "fetching product");
    let product = state
        .store
        .by_id(id)
        .ok_or(ApiError::NotFound { code: "product_not_found", trace_id: None })?;
    Ok(Json(product))
}

pub async fn list_products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    principal: AuthenticatedPrincipal,
) -> ApiResult<Json<Vec<Product>>> {
    ensure_allowed(&principal, &PRODUCT_ACCESS)?;
    info!(identity = %principal.identity, %category, "listing products by category");
    Ok(Json(state.store.by_category(&category)))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "product-service" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/products/health", get(health))
        .route("/products", get(list_products))
        .route("/products/category/:category", get(list_products_by_category))
        .route("/products/:id", get(get_product))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_are_kept_in_minor_units() {
        let store = ProductStore::with_default_seed();
        let keyboard = store.by_id(2).expect("seeded");
        assert_eq!(keyboard.price_cents, 8_950);
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let store = ProductStore::with_default_seed();
        assert_eq!(store.by_category("Electronics").len(), 3);
        assert_eq!(store.by_category("furniture").len(), 2);
        assert!(store.by_category("groceries").is_empty());
    }
}
