//! # Entity Repositories
//!
//! One repository per collection. Each holds an injected
//! [`crate::DocumentStore`] handle and owns the persistence contract for
//! its entity: identifier parsing before any store access, stripping of
//! server-assigned fields, timestamp stamping, and field-overwrite merge
//! on update.

pub mod products;
pub mod suppliers;
pub mod users;

pub use products::ProductRepository;
pub use suppliers::SupplierRepository;
pub use users::UserRepository;

use bson::{oid::ObjectId, Document};

/// Remove the server-assigned fields a client must never set.
pub(crate) fn strip_protected(mut payload: Document) -> Document {
    payload.remove("_id");
    payload.remove("createdAt");
    payload.remove("updatedAt");
    payload
}

/// Rebuild a persisted document with its identifier leading, the way the
/// store returns it on reads.
pub(crate) fn with_id(id: ObjectId, doc: Document) -> Document {
    let mut out = Document::new();
    out.insert("_id", id);
    out.extend(doc);
    out
}
