//! # User Management Routes
//!
//! Account administration, gated on the `admin` role:
//!
//! - `GET    /api/users` — list users
//! - `GET    /api/users/:id` — get user
//! - `PUT    /api/users/:id` — update user (immutable fields stripped)
//! - `DELETE /api/users/:id` — delete user
//!
//! Every response is sanitized by the repository — no password digest
//! ever leaves this surface.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use stockroom_auth::{require_role, Identity};
use stockroom_core::{Role, RoleSet};
use stockroom_domain::{user, wire};

use crate::auth::CurrentIdentity;
use crate::error::ApiError;
use crate::extractors::validated_payload;
use crate::state::AppState;

/// Build the user-management router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    require_role(identity, RoleSet::from_iter([Role::Admin]))?;
    Ok(())
}

async fn list_users(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;
    let users = state.users.find_all().await?;
    Ok(Json(Value::Array(
        users.iter().map(wire::document_to_json).collect(),
    )))
}

async fn get_user(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;
    let user_doc = state
        .users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(wire::document_to_json(&user_doc)))
}

async fn update_user(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;
    let payload = validated_payload(body, user::validate_update)?;
    let updated = state.users.update(&id, payload).await?;
    Ok(Json(wire::document_to_json(&updated)))
}

async fn delete_user(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;
    state.users.delete(&id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
