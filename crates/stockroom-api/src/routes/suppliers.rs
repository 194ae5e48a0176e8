//! # Supplier Routes
//!
//! - `GET    /api/suppliers` — list suppliers
//! - `GET    /api/suppliers/:id` — get supplier
//! - `POST   /api/suppliers` — create supplier
//! - `PUT    /api/suppliers/:id` — update supplier
//! - `DELETE /api/suppliers/:id` — delete supplier

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use stockroom_domain::{supplier, wire};

use crate::error::ApiError;
use crate::extractors::validated_payload;
use crate::state::AppState;

/// Build the suppliers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/suppliers", get(list_suppliers).post(create_supplier))
        .route(
            "/api/suppliers/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

async fn list_suppliers(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let suppliers = state.suppliers.find_all().await?;
    Ok(Json(Value::Array(
        suppliers.iter().map(wire::document_to_json).collect(),
    )))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let supplier = state
        .suppliers
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Supplier not found".into()))?;
    Ok(Json(wire::document_to_json(&supplier)))
}

async fn create_supplier(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = validated_payload(body, supplier::validate)?;
    let created = state.suppliers.create(payload).await?;
    Ok((StatusCode::CREATED, Json(wire::document_to_json(&created))))
}

async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let payload = validated_payload(body, supplier::validate)?;
    let updated = state.suppliers.update(&id, payload).await?;
    Ok(Json(wire::document_to_json(&updated)))
}

async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.suppliers.delete(&id).await?;
    Ok(Json(json!({ "message": "Supplier deleted successfully" })))
}
