//! # Roles
//!
//! A closed role enumeration with a small bitset for role collections.
//! Access checks are set intersections; unknown role strings are rejected
//! at deserialization time rather than silently carried along.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// Roles a user account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default role granted on registration.
    User,
    /// Administrative role; required for account management endpoints.
    Admin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse a role string. Returns `None` for unknown roles.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Self::User => 1 << 0,
            Self::Admin => 1 << 1,
        }
    }

    const ALL: [Role; 2] = [Role::User, Role::Admin];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of roles, backed by a bitset.
///
/// Serializes as a JSON array of role strings (the wire format the rest of
/// the system expects for the `roles` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// The empty role set.
    pub const EMPTY: RoleSet = RoleSet(0);

    /// The default set assigned at account creation: `{user}`.
    pub fn user_default() -> Self {
        Self::from_iter([Role::User])
    }

    /// Add a role to the set.
    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    /// Whether the set contains `role`.
    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    /// Whether this set shares at least one role with `other`.
    ///
    /// This is the "any allowed role matches" authorization check.
    pub fn intersects(&self, other: RoleSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the roles in the set in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.contains(*r))
    }

    /// The role strings in the set, in declaration order.
    pub fn as_strings(&self) -> Vec<&'static str> {
        self.iter().map(|r| r.as_str()).collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::EMPTY;
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl Serialize for RoleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let roles: Vec<Role> = self.iter().collect();
        let mut seq = serializer.serialize_seq(Some(roles.len()))?;
        for role in roles {
            seq.serialize_element(&role)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoleSetVisitor;

        impl<'de> Visitor<'de> for RoleSetVisitor {
            type Value = RoleSet;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an array of role strings")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RoleSet, A::Error> {
                let mut set = RoleSet::EMPTY;
                while let Some(name) = seq.next_element::<String>()? {
                    let role = Role::parse(&name)
                        .ok_or_else(|| de::Error::custom(format!("unknown role '{name}'")))?;
                    set.insert(role);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(RoleSetVisitor)
    }
}
