//! # MongoDB Store Backend
//!
//! [`DocumentStore`] over the MongoDB driver. The client multiplexes
//! connections internally, so one [`MongoStore`] value serves every
//! in-flight operation without additional locking.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use stockroom_core::StoreError;

use crate::store::DocumentStore;

/// MongoDB-backed [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Wrap an already-connected database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Connect to `uri` and select `db_name`.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        tracing::info!(db = db_name, "connected to MongoDB");
        Ok(Self {
            db: client.database(db_name),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

/// Map a driver error, surfacing unique-index violations distinctly.
fn map_err(err: mongodb::error::Error) -> StoreError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = &*err.kind {
        if write_error.code == 11000 {
            return StoreError::DuplicateKey(write_error.message.clone());
        }
    }
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .collection(collection)
            .find(filter, None)
            .await
            .map_err(map_err)?;
        cursor.try_collect().await.map_err(map_err)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one(filter, None)
            .await
            .map_err(map_err)
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<ObjectId, StoreError> {
        let result = self
            .collection(collection)
            .insert_one(doc, None)
            .await
            .map_err(map_err)?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Backend("store assigned a non-ObjectId identifier".into()))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
    ) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": set }, None)
            .await
            .map_err(map_err)?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(filter, None)
            .await
            .map_err(map_err)?;
        Ok(result.deleted_count)
    }

    async fn count_documents(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<u64, StoreError> {
        self.collection(collection)
            .count_documents(filter, None)
            .await
            .map_err(map_err)
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection(collection)
            .create_index(index, None)
            .await
            .map_err(map_err)?;
        Ok(())
    }
}
