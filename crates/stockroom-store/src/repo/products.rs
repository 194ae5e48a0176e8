//! # Product Repository
//!
//! CRUD over the `products` collection, plus the by-supplier query. A
//! syntactically valid `supplierId` string is coerced to the native
//! identifier on write; an invalid one is left as a string — the
//! validator, which runs before the repository in every handler, is what
//! rejects it.

use std::sync::Arc;

use bson::{doc, oid::ObjectId, Bson, Document};
use stockroom_core::{id, temporal, DomainError, EntityKind};
use stockroom_domain::product::COLLECTION;

use crate::repo::{strip_protected, with_id};
use crate::store::DocumentStore;

/// Repository for catalog products.
#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProductRepository {
    /// Create a repository over the injected store handle.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All products.
    pub async fn find_all(&self) -> Result<Vec<Document>, DomainError> {
        Ok(self.store.find(COLLECTION, doc! {}).await?)
    }

    /// A product by identifier. `Ok(None)` when no document matches.
    pub async fn find_by_id(&self, raw_id: &str) -> Result<Option<Document>, DomainError> {
        let oid = id::parse(raw_id, EntityKind::Product)?;
        Ok(self.store.find_one(COLLECTION, doc! { "_id": oid }).await?)
    }

    /// All products referencing the given supplier. The supplier
    /// identifier is validated and coerced first; an empty result is not
    /// an error.
    pub async fn find_by_supplier(&self, raw_id: &str) -> Result<Vec<Document>, DomainError> {
        let oid = id::parse(raw_id, EntityKind::Supplier)?;
        Ok(self
            .store
            .find(COLLECTION, doc! { "supplierId": oid })
            .await?)
    }

    /// Persist a new product. Server-assigned fields in the payload are
    /// discarded; `createdAt` is stamped; `updatedAt` stays absent until
    /// the first update.
    pub async fn create(&self, payload: Document) -> Result<Document, DomainError> {
        let mut doc = strip_protected(payload);
        coerce_supplier_id(&mut doc);
        doc.insert("createdAt", temporal::now_iso());

        let id = self.store.insert_one(COLLECTION, doc.clone()).await?;
        Ok(with_id(id, doc))
    }

    /// Field-overwrite merge into an existing product. Fields absent from
    /// the payload are untouched; nested structures are replaced
    /// wholesale. Returns the refreshed document.
    pub async fn update(&self, raw_id: &str, payload: Document) -> Result<Document, DomainError> {
        let oid = id::parse(raw_id, EntityKind::Product)?;

        let mut set = strip_protected(payload);
        coerce_supplier_id(&mut set);
        set.insert("updatedAt", temporal::now_iso());

        let matched = self
            .store
            .update_one(COLLECTION, doc! { "_id": oid }, set)
            .await?;
        if matched == 0 {
            return Err(DomainError::not_found(EntityKind::Product));
        }

        self.store
            .find_one(COLLECTION, doc! { "_id": oid })
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Product))
    }

    /// Delete a product. Fails with not-found when nothing was removed.
    pub async fn delete(&self, raw_id: &str) -> Result<(), DomainError> {
        let oid = id::parse(raw_id, EntityKind::Product)?;
        let deleted = self
            .store
            .delete_one(COLLECTION, doc! { "_id": oid })
            .await?;
        if deleted == 0 {
            return Err(DomainError::not_found(EntityKind::Product));
        }
        Ok(())
    }
}

/// Coerce a syntactically valid `supplierId` string to the native
/// identifier, leaving anything else untouched.
fn coerce_supplier_id(doc: &mut Document) {
    let coerced = match doc.get("supplierId") {
        Some(Bson::String(raw)) => ObjectId::parse_str(raw).ok(),
        _ => None,
    };
    if let Some(oid) = coerced {
        doc.insert("supplierId", oid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use async_trait::async_trait;
    use stockroom_core::StoreError;

    fn repo() -> ProductRepository {
        ProductRepository::new(Arc::new(MemoryStore::new()))
    }

    fn payload() -> Document {
        doc! {
            "name": "Anvil",
            "description": "A heavy drop-forged steel anvil.",
            "price": 129.99,
            "stock": 12,
            "category": "hardware",
            "isAvailable": true,
        }
    }

    // ── Round trip ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_then_find_by_id_round_trips() {
        let repo = repo();
        let created = repo.create(payload()).await.unwrap();

        let id = created.get_object_id("_id").unwrap();
        let found = repo.find_by_id(&id.to_hex()).await.unwrap().unwrap();

        assert_eq!(found.get_str("name").unwrap(), "Anvil");
        assert_eq!(found.get_bool("isAvailable").unwrap(), true);
        assert!(found.get_str("createdAt").is_ok());
        assert!(
            !found.contains_key("updatedAt"),
            "updatedAt must be absent before the first update"
        );
        assert_eq!(found.get_str("createdAt").unwrap(), created.get_str("createdAt").unwrap());
        assert_eq!(found.get_f64("price").unwrap(), created.get_f64("price").unwrap());
    }

    #[tokio::test]
    async fn test_create_discards_client_supplied_server_fields() {
        let repo = repo();
        let mut p = payload();
        p.insert("_id", ObjectId::new());
        p.insert("createdAt", "1999-01-01T00:00:00.000Z");
        p.insert("updatedAt", "1999-01-01T00:00:00.000Z");

        let created = repo.create(p).await.unwrap();
        assert_ne!(created.get_str("createdAt").unwrap(), "1999-01-01T00:00:00.000Z");
        assert!(!created.contains_key("updatedAt"));
    }

    // ── Identifier handling ──────────────────────────────────────────

    /// Store double that panics on any contact — proves malformed
    /// identifiers are rejected before the store layer.
    struct UnreachableStore;

    #[async_trait]
    impl DocumentStore for UnreachableStore {
        async fn find(&self, _: &str, _: Document) -> Result<Vec<Document>, StoreError> {
            unreachable!("store must not be contacted")
        }
        async fn find_one(&self, _: &str, _: Document) -> Result<Option<Document>, StoreError> {
            unreachable!("store must not be contacted")
        }
        async fn insert_one(&self, _: &str, _: Document) -> Result<ObjectId, StoreError> {
            unreachable!("store must not be contacted")
        }
        async fn update_one(&self, _: &str, _: Document, _: Document) -> Result<u64, StoreError> {
            unreachable!("store must not be contacted")
        }
        async fn delete_one(&self, _: &str, _: Document) -> Result<u64, StoreError> {
            unreachable!("store must not be contacted")
        }
        async fn count_documents(&self, _: &str, _: Document) -> Result<u64, StoreError> {
            unreachable!("store must not be contacted")
        }
        async fn ensure_unique(&self, _: &str, _: &str) -> Result<(), StoreError> {
            unreachable!("store must not be contacted")
        }
    }

    #[tokio::test]
    async fn test_malformed_id_never_reaches_the_store() {
        let repo = ProductRepository::new(Arc::new(UnreachableStore));

        for raw in ["", "short", "507f1f77bcf86cd79943901g", "507f1f77bcf86cd7994390111"] {
            assert!(matches!(
                repo.find_by_id(raw).await.unwrap_err(),
                DomainError::InvalidId { entity: EntityKind::Product }
            ));
            assert!(matches!(
                repo.update(raw, payload()).await.unwrap_err(),
                DomainError::InvalidId { entity: EntityKind::Product }
            ));
            assert!(matches!(
                repo.delete(raw).await.unwrap_err(),
                DomainError::InvalidId { entity: EntityKind::Product }
            ));
            assert!(matches!(
                repo.find_by_supplier(raw).await.unwrap_err(),
                DomainError::InvalidId { entity: EntityKind::Supplier }
            ));
        }
    }

    #[tokio::test]
    async fn test_find_by_id_absent_is_none_not_error() {
        let repo = repo();
        let missing = repo
            .find_by_id("507f1f77bcf86cd799439011")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    // ── Supplier coercion ────────────────────────────────────────────

    #[tokio::test]
    async fn test_valid_supplier_id_coerced_to_native() {
        let repo = repo();
        let mut p = payload();
        p.insert("supplierId", "507f1f77bcf86cd799439011");

        let created = repo.create(p).await.unwrap();
        assert!(matches!(created.get("supplierId"), Some(Bson::ObjectId(_))));
    }

    #[tokio::test]
    async fn test_invalid_supplier_id_left_as_string() {
        let repo = repo();
        let mut p = payload();
        p.insert("supplierId", "not-a-valid-id");

        let created = repo.create(p).await.unwrap();
        assert!(matches!(created.get("supplierId"), Some(Bson::String(_))));
    }

    #[tokio::test]
    async fn test_find_by_supplier_matches_coerced_reference() {
        let repo = repo();
        let supplier = ObjectId::new().to_hex();

        let mut owned = payload();
        owned.insert("supplierId", supplier.clone());
        repo.create(owned).await.unwrap();
        repo.create(payload()).await.unwrap();

        let matched = repo.find_by_supplier(&supplier).await.unwrap();
        assert_eq!(matched.len(), 1);

        let other = repo.find_by_supplier(&ObjectId::new().to_hex()).await.unwrap();
        assert!(other.is_empty());
    }

    // ── Update semantics ─────────────────────────────────────────────

    #[tokio::test]
    async fn test_update_merges_only_given_fields() {
        let repo = repo();
        let mut p = payload();
        p.insert("dimensions", doc! { "height": 30, "width": 20, "unit": "cm" });
        let created = repo.create(p).await.unwrap();
        let id = created.get_object_id("_id").unwrap().to_hex();

        let updated = repo
            .update(&id, doc! { "stock": 4, "dimensions": doc! { "height": 31 } })
            .await
            .unwrap();

        assert_eq!(updated.get_i32("stock").unwrap(), 4);
        assert_eq!(updated.get_str("name").unwrap(), "Anvil");
        assert_eq!(updated.get_f64("price").unwrap(), 129.99);
        // Nested structures are replaced wholesale, not deep-merged.
        let dims = updated.get_document("dimensions").unwrap();
        assert_eq!(dims.get_i32("height").unwrap(), 31);
        assert!(!dims.contains_key("width"));
        assert!(updated.get_str("updatedAt").is_ok());
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at_not_before_created_at() {
        let repo = repo();
        let created = repo.create(payload()).await.unwrap();
        let id = created.get_object_id("_id").unwrap().to_hex();

        let updated = repo.update(&id, doc! { "stock": 1 }).await.unwrap();
        let created_at = temporal::parse_iso(updated.get_str("createdAt").unwrap()).unwrap();
        let updated_at = temporal::parse_iso(updated.get_str("updatedAt").unwrap()).unwrap();
        assert!(updated_at >= created_at);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let repo = repo();
        let err = repo
            .update("507f1f77bcf86cd799439011", doc! { "stock": 1 })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: EntityKind::Product }));
    }

    // ── Delete semantics ─────────────────────────────────────────────

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let repo = repo();
        let created = repo.create(payload()).await.unwrap();
        let id = created.get_object_id("_id").unwrap().to_hex();

        repo.delete(&id).await.unwrap();
        let err = repo.delete(&id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: EntityKind::Product }));
    }
}
