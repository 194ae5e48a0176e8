//! # Temporal Helpers
//!
//! Server-assigned timestamps (`createdAt`, `updatedAt`) are stored as
//! ISO 8601 strings in UTC with millisecond precision and a `Z` suffix —
//! the format the rest of the ecosystem (and every existing document in a
//! migrated collection) already uses.

use chrono::{DateTime, SecondsFormat, Utc};

/// The current instant as an ISO 8601 string, e.g. `2026-08-06T12:34:56.789Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO 8601 timestamp string back to a UTC datetime.
///
/// Used by tests and ordering checks; returns `None` for anything that is
/// not a valid RFC 3339 timestamp.
pub fn parse_iso(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
