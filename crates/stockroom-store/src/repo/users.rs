//! # User Repository
//!
//! CRUD over the `users` collection, plus the lookups the credential
//! subsystem needs. Every document leaving this repository is sanitized —
//! the `password` key is removed, not emptied — with one deliberate
//! exception: [`UserRepository::find_by_email`] returns the stored digest
//! because login verification needs it.
//!
//! Email uniqueness is enforced twice: a pre-check for a friendly error,
//! and a store-level unique index (installed by
//! [`UserRepository::ensure_indexes`]) that closes the race between the
//! check and the insert.

use std::sync::Arc;

use bson::{doc, Bson, Document};
use stockroom_core::{id, temporal, DomainError, EntityKind, FieldError, RoleSet, StoreError};
use stockroom_domain::user::COLLECTION;
use stockroom_domain::OAuthProfile;

use crate::repo::{strip_protected, with_id};
use crate::store::DocumentStore;

/// Repository for user accounts.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    /// Create a repository over the injected store handle.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Install the unique email index. Called once at startup.
    pub async fn ensure_indexes(&self) -> Result<(), DomainError> {
        self.store.ensure_unique(COLLECTION, "email").await?;
        Ok(())
    }

    /// All users, sanitized.
    pub async fn find_all(&self) -> Result<Vec<Document>, DomainError> {
        let users = self.store.find(COLLECTION, doc! {}).await?;
        Ok(users.into_iter().map(sanitize).collect())
    }

    /// A user by identifier, sanitized. `Ok(None)` when no match.
    pub async fn find_by_id(&self, raw_id: &str) -> Result<Option<Document>, DomainError> {
        let oid = id::parse(raw_id, EntityKind::User)?;
        let user = self.store.find_one(COLLECTION, doc! { "_id": oid }).await?;
        Ok(user.map(sanitize))
    }

    /// A user by case-folded email, **unsanitized** — the stored password
    /// digest is present. Only the credential subsystem should call this.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Document>, DomainError> {
        Ok(self
            .store
            .find_one(COLLECTION, doc! { "email": email.to_lowercase() })
            .await?)
    }

    /// A user by external provider identifier, sanitized.
    pub async fn find_by_github_id(&self, github_id: &str) -> Result<Option<Document>, DomainError> {
        let user = self
            .store
            .find_one(COLLECTION, doc! { "githubId": github_id })
            .await?;
        Ok(user.map(sanitize))
    }

    /// Persist a new account. The payload's `password` is discarded — the
    /// caller hashes the plaintext and passes the digest separately (no
    /// digest means a password-less OAuth-style account). Roles are never
    /// client-settable; every new account starts as `{user}`.
    pub async fn create(
        &self,
        payload: Document,
        password_hash: Option<String>,
    ) -> Result<Document, DomainError> {
        let mut doc = strip_protected(payload);
        doc.remove("password");
        doc.remove("roles");

        let email = doc
            .get_str("email")
            .map(str::to_lowercase)
            .map_err(|_| DomainError::Validation(vec![FieldError::new("email", "email is required")]))?;
        doc.insert("email", email.clone());

        if self
            .store
            .find_one(COLLECTION, doc! { "email": &email })
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateEmail);
        }

        if let Some(hash) = password_hash {
            doc.insert("password", hash);
        }
        doc.insert("roles", roles_to_bson(RoleSet::user_default()));
        doc.insert("createdAt", temporal::now_iso());

        let id = self
            .store
            .insert_one(COLLECTION, doc.clone())
            .await
            .map_err(duplicate_as_email_taken)?;
        Ok(sanitize(with_id(id, doc)))
    }

    /// Field-overwrite merge into an existing account. Sensitive and
    /// immutable fields (`password`, `githubId`, `roles`) are stripped
    /// from the payload; an email change re-checks uniqueness excluding
    /// this account. Returns the refreshed, sanitized document.
    pub async fn update(&self, raw_id: &str, payload: Document) -> Result<Document, DomainError> {
        let oid = id::parse(raw_id, EntityKind::User)?;

        let mut set = strip_protected(payload);
        set.remove("password");
        set.remove("githubId");
        set.remove("roles");

        if let Ok(email) = set.get_str("email").map(str::to_lowercase) {
            set.insert("email", email.clone());
            if let Some(existing) = self
                .store
                .find_one(COLLECTION, doc! { "email": &email })
                .await?
            {
                if existing.get_object_id("_id").ok() != Some(oid) {
                    return Err(DomainError::DuplicateEmail);
                }
            }
        }
        set.insert("updatedAt", temporal::now_iso());

        let matched = self
            .store
            .update_one(COLLECTION, doc! { "_id": oid }, set)
            .await
            .map_err(duplicate_as_email_taken)?;
        if matched == 0 {
            return Err(DomainError::not_found(EntityKind::User));
        }

        let user = self.store.find_one(COLLECTION, doc! { "_id": oid }).await?;
        user.map(sanitize)
            .ok_or_else(|| DomainError::not_found(EntityKind::User))
    }

    /// Delete an account. Fails with not-found when nothing was removed.
    pub async fn delete(&self, raw_id: &str) -> Result<(), DomainError> {
        let oid = id::parse(raw_id, EntityKind::User)?;
        let deleted = self
            .store
            .delete_one(COLLECTION, doc! { "_id": oid })
            .await?;
        if deleted == 0 {
            return Err(DomainError::not_found(EntityKind::User));
        }
        Ok(())
    }

    /// Resolve an OAuth profile to an account. Provider data is trusted —
    /// this path never runs the payload validator. An existing account
    /// (matched on `githubId`) gets its name and avatar refreshed; a new
    /// one is synthesized with no password and the default role set.
    pub async fn find_or_create_from_profile(
        &self,
        profile: &OAuthProfile,
    ) -> Result<Document, DomainError> {
        let existing = self
            .store
            .find_one(COLLECTION, doc! { "githubId": &profile.provider_id })
            .await?;

        if existing.is_some() {
            let mut set = doc! {
                "name": profile.preferred_name(),
                "updatedAt": temporal::now_iso(),
            };
            if let Some(avatar) = profile.avatar() {
                set.insert("avatar", avatar);
            }
            self.store
                .update_one(COLLECTION, doc! { "githubId": &profile.provider_id }, set)
                .await?;
            return self
                .find_by_github_id(&profile.provider_id)
                .await?
                .ok_or_else(|| DomainError::not_found(EntityKind::User));
        }

        let mut doc = doc! {
            "githubId": &profile.provider_id,
            "name": profile.preferred_name(),
            "email": profile.email_or_placeholder().to_lowercase(),
            "roles": roles_to_bson(RoleSet::user_default()),
            "createdAt": temporal::now_iso(),
        };
        if let Some(avatar) = profile.avatar() {
            doc.insert("avatar", avatar);
        }

        let id = self
            .store
            .insert_one(COLLECTION, doc.clone())
            .await
            .map_err(duplicate_as_email_taken)?;
        Ok(sanitize(with_id(id, doc)))
    }
}

/// Remove the password digest. Key-absence, not value-emptiness.
fn sanitize(mut user: Document) -> Document {
    user.remove("password");
    user
}

fn roles_to_bson(roles: RoleSet) -> Bson {
    Bson::Array(
        roles
            .as_strings()
            .into_iter()
            .map(|s| Bson::String(s.to_string()))
            .collect(),
    )
}

/// A unique-index rejection on this collection means the email lost a
/// race; anything else is a genuine store failure.
fn duplicate_as_email_taken(err: StoreError) -> DomainError {
    match err {
        StoreError::DuplicateKey(_) => DomainError::DuplicateEmail,
        other => DomainError::Store(other),
    }
}
