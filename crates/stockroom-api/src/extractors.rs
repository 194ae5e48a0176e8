//! # Payload Extraction & Validation
//!
//! Handlers take the JSON body as `Result<Json<Value>, JsonRejection>`
//! and run it through these helpers: parse failures map to 400, the
//! entity validator runs before anything touches a repository, and a
//! non-empty error list short-circuits with the field list attached.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use bson::Document;
use serde_json::Value;
use stockroom_core::FieldError;
use stockroom_domain::wire;

use crate::error::ApiError;

/// Extract a JSON object body as a BSON document, mapping parse failures
/// to 400.
pub fn extract_payload(result: Result<Json<Value>, JsonRejection>) -> Result<Document, ApiError> {
    let Json(value) = result.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    wire::json_to_document(&value)
        .ok_or_else(|| ApiError::BadRequest("Request body must be a JSON object".into()))
}

/// Extract a JSON object body and run it through an entity validator.
pub fn validated_payload(
    result: Result<Json<Value>, JsonRejection>,
    validator: fn(&Document) -> Vec<FieldError>,
) -> Result<Document, ApiError> {
    let payload = extract_payload(result)?;
    let errors = validator(&payload);
    if errors.is_empty() {
        Ok(payload)
    } else {
        Err(ApiError::Validation(errors))
    }
}
