//! # In-Memory Store Backend
//!
//! A [`DocumentStore`] over `parking_lot`-guarded hash maps. All
//! operations are synchronous under the hood (the lock is never held
//! across an `.await` point); the async surface exists to satisfy the
//! trait. Unique indexes registered via `ensure_unique` are enforced on
//! insert and update, matching the MongoDB backend's behavior.

use std::collections::HashMap;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use parking_lot::RwLock;
use stockroom_core::StoreError;

use crate::store::DocumentStore;

#[derive(Debug, Default)]
struct MemoryCollection {
    docs: Vec<Document>,
    unique_fields: Vec<String>,
}

/// In-memory [`DocumentStore`] for tests and store-less development.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Whether `doc` satisfies every top-level equality in `filter`.
fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

impl MemoryCollection {
    /// The unique field violated by writing `candidate`, skipping the
    /// document at `exclude` (the document being updated), if any.
    fn unique_violation(&self, candidate: &Document, exclude: Option<usize>) -> Option<String> {
        for field in &self.unique_fields {
            let value = match candidate.get(field) {
                Some(Bson::Null) | None => continue,
                Some(v) => v,
            };
            let collision = self.docs.iter().enumerate().any(|(i, existing)| {
                Some(i) != exclude && existing.get(field) == Some(value)
            });
            if collision {
                return Some(field.clone());
            }
        }
        None
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, StoreError> {
        let guard = self.collections.read();
        Ok(guard
            .get(collection)
            .map(|c| {
                c.docs
                    .iter()
                    .filter(|doc| matches(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        let guard = self.collections.read();
        Ok(guard
            .get(collection)
            .and_then(|c| c.docs.iter().find(|doc| matches(doc, &filter)).cloned()))
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<ObjectId, StoreError> {
        let mut guard = self.collections.write();
        let coll = guard.entry(collection.to_string()).or_default();

        let id = match doc.get_object_id("_id") {
            Ok(existing) => existing,
            Err(_) => {
                let id = ObjectId::new();
                doc.insert("_id", id);
                id
            }
        };

        if let Some(field) = coll.unique_violation(&doc, None) {
            return Err(StoreError::DuplicateKey(field));
        }

        coll.docs.push(doc);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
    ) -> Result<u64, StoreError> {
        let mut guard = self.collections.write();
        let Some(coll) = guard.get_mut(collection) else {
            return Ok(0);
        };
        let Some(index) = coll.docs.iter().position(|doc| matches(doc, &filter)) else {
            return Ok(0);
        };

        let mut merged = coll.docs[index].clone();
        for (key, value) in &set {
            merged.insert(key.clone(), value.clone());
        }

        if let Some(field) = coll.unique_violation(&merged, Some(index)) {
            return Err(StoreError::DuplicateKey(field));
        }

        coll.docs[index] = merged;
        Ok(1)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let mut guard = self.collections.write();
        let Some(coll) = guard.get_mut(collection) else {
            return Ok(0);
        };
        match coll.docs.iter().position(|doc| matches(doc, &filter)) {
            Some(index) => {
                coll.docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count_documents(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<u64, StoreError> {
        let guard = self.collections.read();
        Ok(guard
            .get(collection)
            .map(|c| c.docs.iter().filter(|doc| matches(doc, &filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut guard = self.collections.write();
        let coll = guard.entry(collection.to_string()).or_default();
        if !coll.unique_fields.iter().any(|f| f == field) {
            coll.unique_fields.push(field.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_assigns_id_and_find_one_matches() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("things", doc! { "name": "anvil" })
            .await
            .unwrap();

        let found = store
            .find_one("things", doc! { "_id": id })
            .await
            .unwrap()
            .expect("inserted document");
        assert_eq!(found.get_str("name").unwrap(), "anvil");
        assert_eq!(found.get_object_id("_id").unwrap(), id);
    }

    #[tokio::test]
    async fn test_find_with_empty_filter_returns_all() {
        let store = MemoryStore::new();
        store.insert_one("things", doc! { "n": 1 }).await.unwrap();
        store.insert_one("things", doc! { "n": 2 }).await.unwrap();

        let all = store.find("things", doc! {}).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(store.count_documents("things", doc! {}).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_filters_on_equality() {
        let store = MemoryStore::new();
        store
            .insert_one("things", doc! { "kind": "a", "n": 1 })
            .await
            .unwrap();
        store
            .insert_one("things", doc! { "kind": "b", "n": 2 })
            .await
            .unwrap();

        let found = store.find("things", doc! { "kind": "b" }).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_i32("n").unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_one_merges_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("things", doc! { "name": "anvil", "stock": 5 })
            .await
            .unwrap();

        let matched = store
            .update_one("things", doc! { "_id": id }, doc! { "stock": 4 })
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let doc = store
            .find_one("things", doc! { "_id": id })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.get_str("name").unwrap(), "anvil");
        assert_eq!(doc.get_i32("stock").unwrap(), 4);
    }

    #[tokio::test]
    async fn test_update_one_unmatched_returns_zero() {
        let store = MemoryStore::new();
        let matched = store
            .update_one("things", doc! { "_id": ObjectId::new() }, doc! { "n": 1 })
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn test_delete_one_removes_exactly_one() {
        let store = MemoryStore::new();
        let id = store.insert_one("things", doc! { "n": 1 }).await.unwrap();

        assert_eq!(
            store.delete_one("things", doc! { "_id": id }).await.unwrap(),
            1
        );
        assert_eq!(
            store.delete_one("things", doc! { "_id": id }).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate_insert() {
        let store = MemoryStore::new();
        store.ensure_unique("users", "email").await.unwrap();

        store
            .insert_one("users", doc! { "email": "a@b.co" })
            .await
            .unwrap();
        let err = store
            .insert_one("users", doc! { "email": "a@b.co" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(field) if field == "email"));
    }

    #[tokio::test]
    async fn test_unique_index_rejects_update_collision() {
        let store = MemoryStore::new();
        store.ensure_unique("users", "email").await.unwrap();

        store
            .insert_one("users", doc! { "email": "a@b.co" })
            .await
            .unwrap();
        let second = store
            .insert_one("users", doc! { "email": "c@d.co" })
            .await
            .unwrap();

        let err = store
            .update_one(
                "users",
                doc! { "_id": second },
                doc! { "email": "a@b.co" },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_unique_index_allows_updating_own_document() {
        let store = MemoryStore::new();
        store.ensure_unique("users", "email").await.unwrap();

        let id = store
            .insert_one("users", doc! { "email": "a@b.co", "name": "A" })
            .await
            .unwrap();
        let matched = store
            .update_one("users", doc! { "_id": id }, doc! { "name": "B" })
            .await
            .unwrap();
        assert_eq!(matched, 1);
    }

    #[tokio::test]
    async fn test_absent_unique_field_not_a_collision() {
        let store = MemoryStore::new();
        store.ensure_unique("users", "githubId").await.unwrap();

        store.insert_one("users", doc! { "n": 1 }).await.unwrap();
        store.insert_one("users", doc! { "n": 2 }).await.unwrap();
    }
}
