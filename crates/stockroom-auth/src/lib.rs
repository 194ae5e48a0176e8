//! # stockroom-auth — Credential Subsystem
//!
//! Password hashing, token issuance/verification, login verification, and
//! the per-request identity/role gate.
//!
//! ## Failure posture
//!
//! Token verification and identity resolution fail **closed and silent**:
//! a malformed, expired, or forged token — or a token whose user no longer
//! exists — resolves to "no identity", never to an error. Public routes
//! keep working for anonymous callers; protected routes reject through
//! [`gate::require_authenticated`] / [`gate::require_role`].

pub mod credentials;
pub mod gate;
pub mod password;
pub mod token;

pub use gate::{authenticate, require_authenticated, require_role, Identity};
pub use token::Claims;
