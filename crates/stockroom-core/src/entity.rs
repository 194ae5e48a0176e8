//! # Entity Kinds
//!
//! Names the three persisted entity kinds. Error variants carry an
//! [`EntityKind`] so a malformed-identifier or not-found failure always
//! says which collection it refers to.

use serde::{Deserialize, Serialize};

/// The persisted entity kinds of the inventory system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A catalog product.
    Product,
    /// A supplier of products.
    Supplier,
    /// An account holder.
    User,
}

impl EntityKind {
    /// Lowercase name, used in identifier error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Supplier => "supplier",
            Self::User => "user",
        }
    }

    /// Capitalized name, used in not-found error messages.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Supplier => "Supplier",
            Self::User => "User",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
