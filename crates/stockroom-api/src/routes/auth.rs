//! # Auth Routes
//!
//! - `POST /api/auth/register` — register with name/email/password
//! - `POST /api/auth/login` — password login
//! - `POST /api/auth/logout` — clear the token cookie
//! - `GET  /api/auth/me` — current identity (requires auth)
//! - `GET  /api/auth/github` — redirect to the provider's authorize URL
//! - `GET  /api/auth/github/callback` — code → profile → account → token
//! - `GET  /api/auth/github/failure` — provider-side failure landing
//!
//! Successful register/login/callback responses set the `token` cookie
//! and return the token in the body as well; logout only clears the
//! cookie — there is no server-side revocation list.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::{json, Value};
use stockroom_auth::{credentials, password, Identity};
use stockroom_domain::{user, wire};

use crate::auth::{CurrentIdentity, TOKEN_COOKIE};
use crate::error::ApiError;
use crate::extractors::extract_payload;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/auth/github", get(github_authorize))
        .route("/api/auth/github/callback", get(github_callback))
        .route("/api/auth/github/failure", get(github_failure))
}

/// The auth cookie: http-only, host-wide, aligned with the token TTL.
fn token_cookie(token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::hours(stockroom_auth::token::TOKEN_TTL_HOURS))
        .build()
}

fn expired_token_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(TOKEN_COOKIE);
    cookie.set_path("/");
    cookie
}

/// Identity + signed token for a freshly persisted user document.
fn issue_for(state: &AppState, user_doc: &bson::Document) -> Result<String, ApiError> {
    let identity = Identity::from_document(user_doc)
        .ok_or_else(|| ApiError::Internal("persisted user document is missing identity fields".into()))?;
    Ok(identity.issue_token(&state.config.jwt_secret)?)
}

// ── Registration & login ────────────────────────────────────────────

async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let mut payload = extract_payload(body)?;
    // Registration is never an OAuth payload; a smuggled provider id must
    // not waive the password requirement or pre-link an account.
    payload.remove("githubId");

    let errors = user::validate(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let digest = match payload.get_str("password") {
        Ok(plain) => Some(password::hash(plain)?),
        Err(_) => None,
    };

    let created = state.users.create(payload, digest).await?;
    let token = issue_for(&state, &created)?;

    let body = json!({
        "message": "User registered successfully",
        "user": wire::document_to_json(&created),
        "token": token,
    });
    Ok((
        jar.add(token_cookie(token)),
        (StatusCode::CREATED, Json(body)),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let (Some(email), Some(plain)) = (request.email, request.password) else {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    };

    let user_doc = credentials::login(&state.users, &email, &plain).await?;
    let token = issue_for(&state, &user_doc)?;

    let body = json!({
        "message": "Login successful",
        "user": wire::document_to_json(&user_doc),
        "token": token,
    });
    Ok((jar.add(token_cookie(token)), Json(body)).into_response())
}

async fn logout(jar: CookieJar) -> Response {
    (
        jar.remove(expired_token_cookie()),
        Json(json!({ "message": "Logout successful" })),
    )
        .into_response()
}

async fn me(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<Value>, ApiError> {
    let user_doc = state
        .users
        .find_by_id(&identity.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".into()))?;
    Ok(Json(json!({ "user": wire::document_to_json(&user_doc) })))
}

// ── OAuth handoff ───────────────────────────────────────────────────

async fn github_authorize(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let github = state
        .config
        .github
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("GitHub OAuth is not configured".into()))?;

    let url = format!(
        "https://github.com/login/oauth/authorize?client_id={}&redirect_uri={}&scope=user:email",
        github.client_id, github.callback_url,
    );
    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
}

async fn github_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let provider = state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("GitHub OAuth is not configured".into()))?;

    let Some(code) = query.code else {
        return Ok(github_failure().await.into_response());
    };

    let profile = match provider.exchange_code(&code).await {
        Ok(profile) => profile,
        Err(err) => {
            tracing::warn!(error = %err, "OAuth code exchange failed");
            return Ok(github_failure().await.into_response());
        }
    };

    let user_doc = state.users.find_or_create_from_profile(&profile).await?;
    let token = issue_for(&state, &user_doc)?;
    let jar = jar.add(token_cookie(token.clone()));

    // A configured frontend receives the caller back; otherwise the
    // handshake answers in place.
    if let Some(frontend) = &state.config.frontend_url {
        let target = format!("{frontend}/login/success?token={token}");
        return Ok((jar, Redirect::temporary(&target)).into_response());
    }

    let body = json!({
        "message": "GitHub authentication successful",
        "user": wire::document_to_json(&user_doc),
        "token": token,
    });
    Ok((jar, Json(body)).into_response())
}

async fn github_failure() -> ApiError {
    ApiError::Unauthorized("GitHub authentication failed".into())
}
