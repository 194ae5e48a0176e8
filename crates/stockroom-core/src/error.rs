//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error taxonomy used throughout Stockroom. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation and identifier errors are detected before any store
//!   access and carry enough structure (field list, entity kind) for the
//!   HTTP layer to render a precise client error.
//! - Store failures are a catch-all: the message is for server-side logs,
//!   never for response bodies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::EntityKind;

/// A single field-level validation error.
///
/// Validators return a list of these; an empty list means the payload is
/// acceptable. Nested fields use dotted paths (`address.street`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The offending field, dotted for nested structures.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldError {
    /// Construct a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure inside the document store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store backend reported an unexpected failure.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A unique constraint rejected the write. Carries the indexed field.
    #[error("duplicate key on field '{0}'")]
    DuplicateKey(String),
}

/// Top-level domain error for every operation in the system.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The payload failed validation. Carries the per-field errors.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// An externally supplied identifier is not a valid store identifier.
    #[error("Invalid {} ID", .entity.as_str())]
    InvalidId {
        /// Which entity's identifier was malformed.
        entity: EntityKind,
    },

    /// No document matched the identifier.
    #[error("{} not found", .entity.title())]
    NotFound {
        /// Which entity was looked up.
        entity: EntityKind,
    },

    /// The email address is already registered to another user.
    #[error("Email already in use")]
    DuplicateEmail,

    /// Login failed: unknown email, password-less account, or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The operation requires an authenticated caller.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The caller is authenticated but lacks a required role.
    #[error("Permission denied")]
    PermissionDenied,

    /// Unexpected store-layer failure. Logged server-side, opaque to callers.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Unexpected failure outside the store layer (e.g. the hashing
    /// routine). Logged server-side, opaque to callers.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidId`].
    pub fn invalid_id(entity: EntityKind) -> Self {
        Self::InvalidId { entity }
    }

    /// Shorthand for [`DomainError::NotFound`].
    pub fn not_found(entity: EntityKind) -> Self {
        Self::NotFound { entity }
    }
}
