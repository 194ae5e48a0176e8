//! # OAuth Identity Provider
//!
//! The seam between the callback handler and the external identity
//! provider. The provider's protocol mechanics live behind
//! [`IdentityProvider`]; the rest of the system only ever sees the
//! resulting [`OAuthProfile`], which it trusts.

use async_trait::async_trait;
use serde::Deserialize;
use stockroom_domain::OAuthProfile;
use thiserror::Error;

use crate::state::GithubOAuthConfig;

/// Failure talking to the identity provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The code→token or profile request failed.
    #[error("identity provider exchange failed: {0}")]
    Exchange(String),

    /// The provider rejected the authorization code.
    #[error("identity provider rejected the authorization code")]
    CodeRejected,
}

/// An external identity provider that can turn an authorization code
/// into a profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange the callback `code` for the account's profile.
    async fn exchange_code(&self, code: &str) -> Result<OAuthProfile, ProviderError>;
}

// ── GitHub ──────────────────────────────────────────────────────────

/// GitHub-backed [`IdentityProvider`].
pub struct GithubProvider {
    http: reqwest::Client,
    config: GithubOAuthConfig,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
}

impl GithubProvider {
    /// Build a provider for the configured OAuth app.
    pub fn new(config: GithubOAuthConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("stockroom-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Exchange(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn fetch_access_token(&self, code: &str) -> Result<String, ProviderError> {
        let response = self
            .http
            .post("https://github.com/login/oauth/access_token")
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Exchange(e.to_string()))?;

        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Exchange(e.to_string()))?;
        token.access_token.ok_or(ProviderError::CodeRejected)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<GithubUser, ProviderError> {
        self.http
            .get("https://api.github.com/user")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Exchange(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Exchange(e.to_string()))?
            .json()
            .await
            .map_err(|e| ProviderError::Exchange(e.to_string()))
    }

    /// Fetch the account's email list. Best-effort: a failure (missing
    /// `user:email` scope) degrades to the public profile email.
    async fn fetch_emails(&self, access_token: &str) -> Vec<GithubEmail> {
        let result = async {
            self.http
                .get("https://api.github.com/user/emails")
                .bearer_auth(access_token)
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<GithubEmail>>()
                .await
        }
        .await;

        match result {
            Ok(emails) => emails,
            Err(e) => {
                tracing::debug!(error = %e, "email scope unavailable; using public profile email");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for GithubProvider {
    async fn exchange_code(&self, code: &str) -> Result<OAuthProfile, ProviderError> {
        let access_token = self.fetch_access_token(code).await?;
        let user = self.fetch_user(&access_token).await?;

        let mut listed = self.fetch_emails(&access_token).await;
        listed.sort_by_key(|e| !e.primary); // primary address first
        let mut emails: Vec<String> = listed.into_iter().map(|e| e.email).collect();
        if emails.is_empty() {
            emails.extend(user.email.clone());
        }

        Ok(OAuthProfile {
            provider_id: user.id.to_string(),
            display_name: user.name,
            username: Some(user.login),
            emails,
            photos: user.avatar_url.into_iter().collect(),
        })
    }
}
