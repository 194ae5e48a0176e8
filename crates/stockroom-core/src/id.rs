//! # Identifier Validation & Coercion
//!
//! The single path from an externally supplied identifier string to the
//! store's native identifier type. Store identifiers are 24-character hex
//! strings coercible to a 12-byte [`ObjectId`].
//!
//! Every repository operation that takes an identifier calls [`parse`]
//! before touching the store — a malformed identifier must never reach the
//! store layer.

use bson::oid::ObjectId;

use crate::entity::EntityKind;
use crate::error::DomainError;

/// Whether `raw` is a syntactically valid store identifier.
pub fn is_valid(raw: &str) -> bool {
    ObjectId::parse_str(raw).is_ok()
}

/// Coerce `raw` to a native identifier, failing with
/// [`DomainError::InvalidId`] tagged with the entity kind.
pub fn parse(raw: &str, entity: EntityKind) -> Result<ObjectId, DomainError> {
    ObjectId::parse_str(raw).map_err(|_| DomainError::InvalidId { entity })
}
