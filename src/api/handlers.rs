use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::logic::{
    effective_color, filter_catalog, parse_selected_ids, prepare_morph_ids, validate_new_product,
    ValidationError,
};
use crate::model::{
    Farm, Id, MorphCategory, MorphId, NewFarm, NewProduct, Product, ProductQueryFilter,
    ProductUpdate, ProductWithMorphs, SelectedMorph,
};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CatalogSearchQuery {
    /// Free-text type-ahead query; empty or absent matches everything
    pub q: Option<String>,
    /// Comma-separated morph ids already selected in the form session
    pub selected: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceMorphsRequest {
    /// The submitted Selection Set. Zero occurrences of the repeated form
    /// field deserialize as an empty list and fail validation.
    #[serde(default)]
    pub morph_ids: Vec<MorphId>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

fn validation_rejection(error: ValidationError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse::new(&error.to_string())),
    )
}

/// Fetch the catalog, absorbing store failures into an empty catalog.
/// Catalog reads fail open: the dropdown renders "no results" instead of an
/// error banner, so outages here are only visible in the logs.
async fn load_catalog_or_empty<S: Store>(store: &S) -> Vec<MorphCategory> {
    match store.fetch_structured_morphs().await {
        Ok(catalog) => catalog,
        Err(e) => {
            log::warn!("catalog fetch failed, serving empty catalog: {}", e);
            Vec::new()
        }
    }
}

/// Resolve a product's persisted morphs into selection entries with
/// effective colors, against a fresh catalog fetch.
async fn resolve_selected_morphs<S: Store>(
    store: &S,
    product_id: &Id,
) -> Result<Vec<SelectedMorph>, (StatusCode, Json<ErrorResponse>)> {
    let morphs = match store.list_product_morphs(product_id).await {
        Ok(morphs) => morphs,
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    let catalog = load_catalog_or_empty(store).await;

    Ok(morphs
        .into_iter()
        .map(|morph| SelectedMorph {
            color: effective_color(&catalog, morph.id),
            id: morph.id,
            name: morph.name,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub async fn get_catalog<S: Store>(
    State(store): State<AppState<S>>,
) -> Json<Vec<MorphCategory>> {
    Json(load_catalog_or_empty(&*store).await)
}

pub async fn search_catalog<S: Store>(
    State(store): State<AppState<S>>,
    Query(params): Query<CatalogSearchQuery>,
) -> Json<Vec<MorphCategory>> {
    let catalog = load_catalog_or_empty(&*store).await;
    let selected = params
        .selected
        .as_deref()
        .map(parse_selected_ids)
        .unwrap_or_default();
    let query = params.q.unwrap_or_default();

    Json(filter_catalog(&catalog, &selected, &query))
}

// ---------------------------------------------------------------------------
// Farms
// ---------------------------------------------------------------------------

pub async fn list_farms<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<ListResponse<Farm>>, (StatusCode, Json<ErrorResponse>)> {
    match store.list_farms().await {
        Ok(farms) => {
            let total = farms.len();
            Ok(Json(ListResponse {
                items: farms,
                total,
            }))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn get_farm<S: Store>(
    State(store): State<AppState<S>>,
    Path(farm_id): Path<Id>,
) -> Result<Json<Farm>, (StatusCode, Json<ErrorResponse>)> {
    match store.get_farm(&farm_id).await {
        Ok(Some(farm)) => Ok(Json(farm)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Farm not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn upsert_farm<S: Store>(
    State(store): State<AppState<S>>,
    RequestJson(new_farm): RequestJson<NewFarm>,
) -> Result<Json<Farm>, (StatusCode, Json<ErrorResponse>)> {
    if new_farm.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new("farm name must not be empty")),
        ));
    }

    let farm = new_farm.into_farm();
    match store.upsert_farm(farm.clone()).await {
        Ok(()) => Ok(Json(farm)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Failed to save farm: {}", e))),
        )),
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

pub async fn list_products<S: Store>(
    State(store): State<AppState<S>>,
    Query(filter): Query<ProductQueryFilter>,
) -> Result<Json<ListResponse<Product>>, (StatusCode, Json<ErrorResponse>)> {
    match store.list_products(&filter).await {
        Ok(products) => {
            let total = products.len();
            Ok(Json(ListResponse {
                items: products,
                total,
            }))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn create_product<S: Store>(
    State(store): State<AppState<S>>,
    RequestJson(new_product): RequestJson<NewProduct>,
) -> Result<Json<ProductWithMorphs>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = validate_new_product(&new_product) {
        return Err(validation_rejection(e));
    }

    // The owning farm must exist before anything is written
    match store.get_farm(&new_product.farm_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new("farm does not exist")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    let morph_ids = match prepare_morph_ids(&new_product.morph_ids) {
        Ok(ids) => ids,
        Err(e) => return Err(validation_rejection(e)),
    };

    let product = new_product.into_product();
    match store.upsert_product(product.clone()).await {
        Ok(()) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&format!(
                    "Failed to create product: {}",
                    e
                ))),
            ))
        }
    }

    match store.replace_product_morphs(&product.id, &morph_ids).await {
        Ok(()) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&format!(
                    "Failed to save product morphs: {}",
                    e
                ))),
            ))
        }
    }

    let morphs = resolve_selected_morphs(&*store, &product.id).await?;
    Ok(Json(ProductWithMorphs { product, morphs }))
}

pub async fn get_product<S: Store>(
    State(store): State<AppState<S>>,
    Path(product_id): Path<Id>,
) -> Result<Json<ProductWithMorphs>, (StatusCode, Json<ErrorResponse>)> {
    let product = match store.get_product(&product_id).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Product not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    let morphs = resolve_selected_morphs(&*store, &product_id).await?;
    Ok(Json(ProductWithMorphs { product, morphs }))
}

pub async fn update_product<S: Store>(
    State(store): State<AppState<S>>,
    Path(product_id): Path<Id>,
    RequestJson(update): RequestJson<ProductUpdate>,
) -> Result<Json<ProductWithMorphs>, (StatusCode, Json<ErrorResponse>)> {
    let mut product = match store.get_product(&product_id).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Product not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    // Validate the replacement selection before any write happens
    let replacement_ids = match &update.morph_ids {
        Some(ids) => match prepare_morph_ids(ids) {
            Ok(ids) => Some(ids),
            Err(e) => return Err(validation_rejection(e)),
        },
        None => None,
    };

    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(validation_rejection(ValidationError::EmptyName));
        }
    }
    if let Some(price) = update.price {
        if price < 0.0 {
            return Err(validation_rejection(ValidationError::NegativePrice));
        }
    }

    update.apply_to(&mut product);
    match store.upsert_product(product.clone()).await {
        Ok(()) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&format!(
                    "Failed to update product: {}",
                    e
                ))),
            ))
        }
    }

    if let Some(morph_ids) = replacement_ids {
        match store.replace_product_morphs(&product_id, &morph_ids).await {
            Ok(()) => {}
            Err(e) => {
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(&format!(
                        "Failed to save product morphs: {}",
                        e
                    ))),
                ))
            }
        }
    }

    let morphs = resolve_selected_morphs(&*store, &product_id).await?;
    Ok(Json(ProductWithMorphs { product, morphs }))
}

pub async fn delete_product<S: Store>(
    State(store): State<AppState<S>>,
    Path(product_id): Path<Id>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    match store.delete_product(&product_id).await {
        Ok(true) => Ok(Json(serde_json::json!({ "deleted": true }))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Product not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn get_product_morphs<S: Store>(
    State(store): State<AppState<S>>,
    Path(product_id): Path<Id>,
) -> Result<Json<Vec<SelectedMorph>>, (StatusCode, Json<ErrorResponse>)> {
    match store.get_product(&product_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Product not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    let morphs = resolve_selected_morphs(&*store, &product_id).await?;
    Ok(Json(morphs))
}

pub async fn replace_product_morphs<S: Store>(
    State(store): State<AppState<S>>,
    Path(product_id): Path<Id>,
    RequestJson(request): RequestJson<ReplaceMorphsRequest>,
) -> Result<Json<Vec<SelectedMorph>>, (StatusCode, Json<ErrorResponse>)> {
    // Reject before any persistence happens
    let morph_ids = match prepare_morph_ids(&request.morph_ids) {
        Ok(ids) => ids,
        Err(e) => return Err(validation_rejection(e)),
    };

    match store.get_product(&product_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Product not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    match store.replace_product_morphs(&product_id, &morph_ids).await {
        Ok(()) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&format!(
                    "Failed to save product morphs: {}",
                    e
                ))),
            ))
        }
    }

    let morphs = resolve_selected_morphs(&*store, &product_id).await?;
    Ok(Json(morphs))
}
