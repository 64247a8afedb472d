use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Morph catalog (read-only reference data)
        .route("/catalog", get(handlers::get_catalog::<S>))
        .route("/catalog/search", get(handlers::search_catalog::<S>))
        // Farm directory
        .route("/farms", get(handlers::list_farms::<S>))
        .route("/farms", post(handlers::upsert_farm::<S>))
        .route("/farms/:farm_id", get(handlers::get_farm::<S>))
        // Storefront listing and product management
        .route("/products", get(handlers::list_products::<S>))
        .route("/products", post(handlers::create_product::<S>))
        .route("/products/:product_id", get(handlers::get_product::<S>))
        .route("/products/:product_id", patch(handlers::update_product::<S>))
        .route(
            "/products/:product_id",
            delete(handlers::delete_product::<S>),
        )
        // Product-morph association
        .route(
            "/products/:product_id/morphs",
            get(handlers::get_product_morphs::<S>),
        )
        .route(
            "/products/:product_id/morphs",
            put(handlers::replace_product_morphs::<S>),
        )
        // Product images uploaded by farms
        .nest_service("/media", ServeDir::new("media"))
}
