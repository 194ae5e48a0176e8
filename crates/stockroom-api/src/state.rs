//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Holds the configuration, the three
//! repositories (all over the one injected store handle), and the
//! optional OAuth identity provider.

use std::sync::Arc;

use stockroom_core::DomainError;
use stockroom_store::{DocumentStore, ProductRepository, SupplierRepository, UserRepository};

use crate::oauth::IdentityProvider;

/// GitHub OAuth application settings.
#[derive(Clone)]
pub struct GithubOAuthConfig {
    /// OAuth app client id.
    pub client_id: String,
    /// OAuth app client secret.
    pub client_secret: String,
    /// Redirect URL registered with the provider.
    pub callback_url: String,
}

impl std::fmt::Debug for GithubOAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// Application configuration, read from the environment at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// Process-wide token signing secret.
    pub jwt_secret: String,
    /// Frontend base URL; when set, the OAuth callback redirects there.
    pub frontend_url: Option<String>,
    /// GitHub OAuth settings; absent means the OAuth routes answer 503.
    pub github: Option<GithubOAuthConfig>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("frontend_url", &self.frontend_url)
            .field("github", &self.github)
            .finish()
    }
}

impl AppConfig {
    /// Build configuration from environment variables, with development
    /// defaults matching the deployed service's.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "your-secret-key".to_string());

        let frontend_url = std::env::var("FRONTEND_URL").ok().filter(|s| !s.is_empty());

        let github = match (
            std::env::var("GITHUB_CLIENT_ID").ok().filter(|s| !s.is_empty()),
            std::env::var("GITHUB_CLIENT_SECRET").ok().filter(|s| !s.is_empty()),
        ) {
            (Some(client_id), Some(client_secret)) => Some(GithubOAuthConfig {
                client_id,
                client_secret,
                callback_url: std::env::var("GITHUB_CALLBACK_URL").unwrap_or_else(|_| {
                    format!("http://localhost:{port}/api/auth/github/callback")
                }),
            }),
            _ => None,
        };

        Self {
            port,
            jwt_secret,
            frontend_url,
            github,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration.
    pub config: AppConfig,
    /// Product repository.
    pub products: ProductRepository,
    /// Supplier repository.
    pub suppliers: SupplierRepository,
    /// User repository.
    pub users: UserRepository,
    /// OAuth identity provider; absent when OAuth is unconfigured.
    pub oauth: Option<Arc<dyn IdentityProvider>>,
}

impl AppState {
    /// Assemble state over the injected store handle.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        oauth: Option<Arc<dyn IdentityProvider>>,
    ) -> Self {
        Self {
            config,
            products: ProductRepository::new(Arc::clone(&store)),
            suppliers: SupplierRepository::new(Arc::clone(&store)),
            users: UserRepository::new(store),
            oauth,
        }
    }

    /// Install store-level indexes. Called once at startup.
    pub async fn ensure_indexes(&self) -> Result<(), DomainError> {
        self.users.ensure_indexes().await
    }
}
