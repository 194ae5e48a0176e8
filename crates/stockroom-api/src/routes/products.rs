//! # Product Routes
//!
//! - `GET    /api/products` — list products
//! - `GET    /api/products/supplier/:supplierId` — products by supplier
//! - `GET    /api/products/:id` — get product
//! - `POST   /api/products` — create product
//! - `PUT    /api/products/:id` — update product
//! - `DELETE /api/products/:id` — delete product

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use stockroom_domain::{product, wire};

use crate::error::ApiError;
use crate::extractors::validated_payload;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/supplier/:supplier_id",
            get(products_by_supplier),
        )
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn list_products(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let products = state.products.find_all().await?;
    Ok(Json(Value::Array(
        products.iter().map(wire::document_to_json).collect(),
    )))
}

async fn products_by_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let products = state.products.find_by_supplier(&supplier_id).await?;
    Ok(Json(Value::Array(
        products.iter().map(wire::document_to_json).collect(),
    )))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    Ok(Json(wire::document_to_json(&product)))
}

async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = validated_payload(body, product::validate)?;
    let created = state.products.create(payload).await?;
    Ok((StatusCode::CREATED, Json(wire::document_to_json(&created))))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let payload = validated_payload(body, product::validate)?;
    let updated = state.products.update(&id, payload).await?;
    Ok(Json(wire::document_to_json(&updated)))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.products.delete(&id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
