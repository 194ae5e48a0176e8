#![deny(missing_docs)]

//! # stockroom-core — Foundational Types for Stockroom
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `thiserror`,
//! `chrono`, and `bson` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **One error taxonomy.** Every recoverable failure in the system is a
//!    [`DomainError`] variant. The HTTP layer maps variants to status codes
//!    in exactly one place; repositories and the credential subsystem never
//!    invent ad-hoc error strings.
//!
//! 2. **Identifiers are validated before the store sees them.** The
//!    [`id`] module is the only path from an externally supplied identifier
//!    string to a store-native [`bson::oid::ObjectId`]. A malformed
//!    identifier fails here, never inside the store layer.
//!
//! 3. **Roles are a closed enumeration.** [`Role`] and [`RoleSet`] replace
//!    free-form role strings; the "any role matches" check is a set
//!    intersection, not a string scan.

pub mod entity;
pub mod error;
pub mod id;
pub mod role;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use entity::EntityKind;
pub use error::{DomainError, FieldError, StoreError};
pub use role::{Role, RoleSet};
