//! # Document Store Abstraction
//!
//! Collection-scoped CRUD over BSON documents — the operation set the
//! repositories actually use. Filters are top-level equality documents;
//! updates are `$set` field-overwrite merges.

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use stockroom_core::StoreError;

/// A handle to a document database.
///
/// Implementations must be safe for concurrent use from many in-flight
/// operations; callers never serialize access.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in `collection` matching `filter` (empty filter
    /// matches everything).
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, StoreError>;

    /// The first document matching `filter`, if any.
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert a document, assigning an identifier when the document lacks
    /// one. Returns the document's identifier. Fails with
    /// [`StoreError::DuplicateKey`] when a unique index rejects the write.
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<ObjectId, StoreError>;

    /// Apply a `$set` merge to the first document matching `filter`.
    /// Returns the number of documents matched (0 or 1).
    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
    ) -> Result<u64, StoreError>;

    /// Delete the first document matching `filter`. Returns the number of
    /// documents removed (0 or 1).
    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;

    /// Count the documents matching `filter`.
    async fn count_documents(&self, collection: &str, filter: Document)
        -> Result<u64, StoreError>;

    /// Install a unique index on `field`. Idempotent; called at startup.
    async fn ensure_unique(&self, collection: &str, field: &str) -> Result<(), StoreError>;
}
