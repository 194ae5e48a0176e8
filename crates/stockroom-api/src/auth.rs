//! # Identity Middleware & Extractors
//!
//! Every request passes through [`identity_middleware`], which resolves
//! the caller's identity from the `Authorization: Bearer` header or the
//! `token` cookie (header wins) and stores the result in request
//! extensions. Resolution never rejects a request — public routes serve
//! anonymous callers; protected handlers extract [`CurrentIdentity`] and
//! get a 401 when it is absent.

use axum::extract::{Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use stockroom_auth::{authenticate, token, Identity};

use crate::error::ApiError;
use crate::state::AppState;

/// The cookie carrying the auth token.
pub const TOKEN_COOKIE: &str = "token";

/// Resolved identity stored in request extensions; `None` is anonymous.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

/// Resolve the caller's identity and attach it to the request.
pub async fn identity_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(token::bearer_token)
        .map(str::to_string);

    let presented = bearer.or_else(|| jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()));

    let identity = authenticate(&state.users, &state.config.jwt_secret, presented.as_deref()).await;
    request.extensions_mut().insert(MaybeIdentity(identity));

    next.run(request).await
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for MaybeIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Absent extension means the middleware didn't run: anonymous.
        Ok(parts
            .extensions
            .get::<MaybeIdentity>()
            .cloned()
            .unwrap_or(MaybeIdentity(None)))
    }
}

/// Extractor for handlers that require an authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CurrentIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<MaybeIdentity>()
            .and_then(|maybe| maybe.0.clone())
            .map(CurrentIdentity)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))
    }
}
