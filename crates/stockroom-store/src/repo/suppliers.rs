//! # Supplier Repository
//!
//! CRUD over the `suppliers` collection.

use std::sync::Arc;

use bson::{doc, Document};
use stockroom_core::{id, temporal, DomainError, EntityKind};
use stockroom_domain::supplier::COLLECTION;

use crate::repo::{strip_protected, with_id};
use crate::store::DocumentStore;

/// Repository for suppliers.
#[derive(Clone)]
pub struct SupplierRepository {
    store: Arc<dyn DocumentStore>,
}

impl SupplierRepository {
    /// Create a repository over the injected store handle.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All suppliers.
    pub async fn find_all(&self) -> Result<Vec<Document>, DomainError> {
        Ok(self.store.find(COLLECTION, doc! {}).await?)
    }

    /// A supplier by identifier. `Ok(None)` when no document matches.
    pub async fn find_by_id(&self, raw_id: &str) -> Result<Option<Document>, DomainError> {
        let oid = id::parse(raw_id, EntityKind::Supplier)?;
        Ok(self.store.find_one(COLLECTION, doc! { "_id": oid }).await?)
    }

    /// Persist a new supplier; `createdAt` stamped, server-assigned
    /// payload fields discarded.
    pub async fn create(&self, payload: Document) -> Result<Document, DomainError> {
        let mut doc = strip_protected(payload);
        doc.insert("createdAt", temporal::now_iso());

        let id = self.store.insert_one(COLLECTION, doc.clone()).await?;
        Ok(with_id(id, doc))
    }

    /// Field-overwrite merge into an existing supplier. The nested
    /// `address` is replaced wholesale when present in the payload.
    pub async fn update(&self, raw_id: &str, payload: Document) -> Result<Document, DomainError> {
        let oid = id::parse(raw_id, EntityKind::Supplier)?;

        let mut set = strip_protected(payload);
        set.insert("updatedAt", temporal::now_iso());

        let matched = self
            .store
            .update_one(COLLECTION, doc! { "_id": oid }, set)
            .await?;
        if matched == 0 {
            return Err(DomainError::not_found(EntityKind::Supplier));
        }

        self.store
            .find_one(COLLECTION, doc! { "_id": oid })
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Supplier))
    }

    /// Delete a supplier. Fails with not-found when nothing was removed.
    pub async fn delete(&self, raw_id: &str) -> Result<(), DomainError> {
        let oid = id::parse(raw_id, EntityKind::Supplier)?;
        let deleted = self
            .store
            .delete_one(COLLECTION, doc! { "_id": oid })
            .await?;
        if deleted == 0 {
            return Err(DomainError::not_found(EntityKind::Supplier));
        }
        Ok(())
    }
}
