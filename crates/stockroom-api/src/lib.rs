//! # stockroom-api — Axum HTTP Layer
//!
//! Assembles the entity routers, auth endpoints, and middleware into the
//! application.
//!
//! ## API Surface
//!
//! | Prefix            | Module                | Notes                      |
//! |-------------------|-----------------------|----------------------------|
//! | `/api/products/*` | [`routes::products`]  | public CRUD + by-supplier  |
//! | `/api/suppliers/*`| [`routes::suppliers`] | public CRUD                |
//! | `/api/auth/*`     | [`routes::auth`]      | register/login/OAuth       |
//! | `/api/users/*`    | [`routes::users`]     | admin-gated account CRUD   |
//! | `/`, `/health`    | `lib.rs`              | unauthenticated            |
//!
//! ## Request pipeline
//!
//! TraceLayer → CORS → identity resolution → handler. Identity
//! resolution never rejects; handlers that need a caller extract
//! [`auth::CurrentIdentity`]. Each handler validates its payload before
//! its repository is touched, and every failure funnels through
//! [`error::ApiError`] into one JSON error shape.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod oauth;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::{AppConfig, AppState};

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::products::router())
        .merge(routes::suppliers::router())
        .merge(routes::auth::router())
        .merge(routes::users::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::identity_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Root and health stay outside the identity middleware.
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    Router::new().merge(public).merge(api)
}

/// `GET /` — service banner with the endpoint index.
async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to the Inventory Management API",
        "endpoints": {
            "products": "/api/products",
            "suppliers": "/api/suppliers",
            "auth": "/api/auth",
        },
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /health` — liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
