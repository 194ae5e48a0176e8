//! # Route Modules
//!
//! Each module defines an Axum router for one API surface area; they are
//! assembled into the application in `lib.rs`.

pub mod auth;
pub mod products;
pub mod suppliers;
pub mod users;
