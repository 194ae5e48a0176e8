//! # stockroom-domain — Entity Model Layer
//!
//! Pure model logic for the three persisted entities: Product, Supplier,
//! and User. Nothing in this crate performs I/O.
//!
//! ## Validators
//!
//! Each entity's validation rules are a declarative table of
//! [`validate::FieldRule`] entries evaluated by a single engine
//! ([`validate::run_rules`]). A validator maps a raw payload document to a
//! list of [`stockroom_core::FieldError`]s; an empty list means the payload
//! is acceptable. Validators are structural only — uniqueness and other
//! store-dependent checks belong to the repositories.
//!
//! ## Wire codec
//!
//! Payloads arrive as JSON and are persisted as BSON documents. The
//! [`wire`] module owns both directions of that conversion, including the
//! rendering of store identifiers as plain 24-hex strings on the way out.

pub mod product;
pub mod profile;
pub mod supplier;
pub mod user;
pub mod validate;
pub mod wire;

pub use profile::OAuthProfile;
pub use supplier::SupplierType;
