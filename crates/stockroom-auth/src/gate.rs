//! # Identity Resolution & Role Gate
//!
//! Per-request resolution of the caller's identity from a presented
//! token, and the two checks handlers compose on top of it. Resolution
//! never errors — anything short of a verified token naming an existing
//! user is an anonymous caller.

use bson::Document;
use stockroom_core::{DomainError, Role, RoleSet};
use stockroom_store::UserRepository;

use crate::token;

/// The resolved, authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User identifier, as its 24-hex string.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email (case-folded).
    pub email: String,
    /// The account's role set.
    pub roles: RoleSet,
}

impl Identity {
    /// Build an identity from a sanitized user document. Returns `None`
    /// when the document lacks the identity fields.
    pub fn from_document(user: &Document) -> Option<Self> {
        let id = user.get_object_id("_id").ok()?.to_hex();
        let email = user.get_str("email").ok()?.to_string();
        let name = user.get_str("name").unwrap_or_default().to_string();

        // Unknown role strings in a legacy document are dropped; an
        // account with no recognizable role falls back to the default.
        let mut roles = RoleSet::EMPTY;
        if let Ok(stored) = user.get_array("roles") {
            for entry in stored {
                if let Some(role) = entry.as_str().and_then(Role::parse) {
                    roles.insert(role);
                }
            }
        }
        if roles.is_empty() {
            roles = RoleSet::user_default();
        }

        Some(Self { id, name, email, roles })
    }

    /// Issue a token for this identity.
    pub fn issue_token(&self, secret: &str) -> Result<String, DomainError> {
        token::issue(secret, &self.id, &self.email, self.roles)
    }
}

/// Resolve a presented token to an identity.
///
/// Any failure — no token, bad token, user since deleted, malformed
/// stored document — yields `None`, never an error: callers proceed as
/// anonymous.
pub async fn authenticate(
    users: &UserRepository,
    secret: &str,
    presented: Option<&str>,
) -> Option<Identity> {
    let Some(claims) = token::verify(secret, presented?) else {
        tracing::debug!("token verification failed; proceeding as anonymous");
        return None;
    };
    let user = users.find_by_id(&claims.sub).await.ok().flatten()?;
    Identity::from_document(&user)
}

/// Require an authenticated caller.
pub fn require_authenticated(identity: Option<&Identity>) -> Result<&Identity, DomainError> {
    identity.ok_or(DomainError::AuthenticationRequired)
}

/// Require that the caller holds at least one of the allowed roles.
pub fn require_role(identity: &Identity, allowed: RoleSet) -> Result<(), DomainError> {
    if identity.roles.intersects(allowed) {
        Ok(())
    } else {
        Err(DomainError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use std::sync::Arc;
    use stockroom_store::MemoryStore;

    const SECRET: &str = "test-signing-secret";

    async fn users() -> UserRepository {
        let users = UserRepository::new(Arc::new(MemoryStore::new()));
        users.ensure_indexes().await.unwrap();
        users
    }

    async fn registered(users: &UserRepository) -> Identity {
        let doc = users
            .create(
                doc! { "name": "John Doe", "email": "john@example.com" },
                Some("digest".into()),
            )
            .await
            .unwrap();
        Identity::from_document(&doc).unwrap()
    }

    // ── authenticate ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_authenticate_resolves_valid_token() {
        let users = users().await;
        let identity = registered(&users).await;
        let token = identity.issue_token(SECRET).unwrap();

        let resolved = authenticate(&users, SECRET, Some(&token)).await.unwrap();
        assert_eq!(resolved, identity);
    }

    #[tokio::test]
    async fn test_authenticate_without_token_is_anonymous() {
        let users = users().await;
        registered(&users).await;
        assert!(authenticate(&users, SECRET, None).await.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_bad_token_is_anonymous() {
        let users = users().await;
        registered(&users).await;
        assert!(authenticate(&users, SECRET, Some("junk")).await.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_deleted_user_is_anonymous() {
        let users = users().await;
        let identity = registered(&users).await;
        let token = identity.issue_token(SECRET).unwrap();

        users.delete(&identity.id).await.unwrap();
        assert!(authenticate(&users, SECRET, Some(&token)).await.is_none());
    }

    // ── Identity::from_document ──────────────────────────────────────

    #[test]
    fn test_identity_defaults_roles_when_unrecognizable() {
        let doc = doc! {
            "_id": bson::oid::ObjectId::new(),
            "name": "Legacy",
            "email": "legacy@example.com",
            "roles": ["superuser"],
        };
        let identity = Identity::from_document(&doc).unwrap();
        assert!(identity.roles.contains(Role::User));
        assert!(!identity.roles.contains(Role::Admin));
    }

    #[test]
    fn test_identity_requires_id_and_email() {
        assert!(Identity::from_document(&doc! { "name": "No Id" }).is_none());
        assert!(Identity::from_document(
            &doc! { "_id": bson::oid::ObjectId::new(), "name": "No Email" }
        )
        .is_none());
    }

    // ── Gate checks ──────────────────────────────────────────────────

    #[tokio::test]
    async fn test_require_authenticated() {
        let users = users().await;
        let identity = registered(&users).await;

        assert!(require_authenticated(Some(&identity)).is_ok());
        assert!(matches!(
            require_authenticated(None).unwrap_err(),
            DomainError::AuthenticationRequired
        ));
    }

    #[tokio::test]
    async fn test_require_role_is_set_intersection() {
        let users = users().await;
        let identity = registered(&users).await; // roles = {user}
        let admins = RoleSet::from_iter([Role::Admin]);
        let anyone = RoleSet::from_iter([Role::User, Role::Admin]);

        assert!(matches!(
            require_role(&identity, admins).unwrap_err(),
            DomainError::PermissionDenied
        ));
        assert!(require_role(&identity, anyone).is_ok());
    }
}
