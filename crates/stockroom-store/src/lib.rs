//! # stockroom-store — Persistence Layer
//!
//! The document store abstraction and the three entity repositories.
//!
//! ## Architecture
//!
//! [`DocumentStore`] is the injected store handle: constructed once at
//! process start and passed into every repository. There is no global
//! connection singleton — repositories are plain values over an
//! `Arc<dyn DocumentStore>`, which makes them trivially testable against
//! the in-memory backend.
//!
//! Two backends implement the trait:
//!
//! - [`MongoStore`] — delegates to the MongoDB driver. The driver's client
//!   multiplexes, so one handle is safe for all in-flight operations.
//! - [`MemoryStore`] — a lock-per-call in-memory backend with the same
//!   contract (including unique-index enforcement), used by tests and
//!   store-less development.
//!
//! ## Repository contract
//!
//! Repositories own the validate-then-persist mechanics that sit above
//! the raw store: identifier parsing before any store access, stripping of
//! server-assigned fields, timestamp stamping, foreign-key coercion,
//! field-overwrite merge on update, and user-document sanitization.

pub mod memory;
pub mod mongo;
pub mod repo;
pub mod store;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use repo::{ProductRepository, SupplierRepository, UserRepository};
pub use store::DocumentStore;
