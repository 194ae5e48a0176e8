//! # Declarative Validation Engine
//!
//! A validator is a table of [`FieldRule`]s evaluated uniformly by
//! [`run_rules`]. Each rule names a field (dotted for nested structures),
//! whether it is required, a type/format predicate, and the message to
//! emit when the predicate fails.
//!
//! ## Presence semantics
//!
//! `0` and `false` count as present. Absent keys, `null`, and the empty
//! string count as missing — a missing required field yields
//! `"{field} is required"`, and its predicate is not evaluated.
//!
//! Rules for nested fields (`address.street`) are skipped entirely when
//! the parent is missing or not a document; the parent's own rule reports
//! that problem.

use bson::{Bson, Document};
use stockroom_core::{id, FieldError};

/// Type/format predicate applied to a present field value.
pub type Check = fn(&Bson) -> bool;

/// One row of a validation rule table.
pub struct FieldRule {
    /// Field name; dotted path for fields inside nested documents.
    pub field: &'static str,
    /// Whether absence of the field is itself an error.
    pub required: bool,
    /// Predicate evaluated when the field is present.
    pub check: Check,
    /// Message emitted when the predicate fails.
    pub message: &'static str,
}

/// Evaluate a rule table against a payload document.
pub fn run_rules(rules: &[FieldRule], payload: &Document) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for rule in rules {
        let value = match rule.field.split_once('.') {
            Some((parent, child)) => match payload.get(parent) {
                // Parent problems are the parent rule's to report.
                Some(Bson::Document(inner)) => inner.get(child),
                _ => continue,
            },
            None => payload.get(rule.field),
        };

        match value {
            v if is_missing(v) => {
                if rule.required {
                    errors.push(FieldError::new(
                        rule.field,
                        format!("{} is required", rule.field),
                    ));
                }
            }
            Some(v) => {
                if !(rule.check)(v) {
                    errors.push(FieldError::new(rule.field, rule.message));
                }
            }
            None => unreachable!("is_missing covers the None case"),
        }
    }

    errors
}

/// Missing means absent, `null`, or the empty string. Zero and `false`
/// are present.
fn is_missing(value: Option<&Bson>) -> bool {
    match value {
        None | Some(Bson::Null) => true,
        Some(Bson::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

// ── Predicates ──────────────────────────────────────────────────────

/// Any value passes. Used for required-only rules.
pub fn any(_: &Bson) -> bool {
    true
}

/// The value is a string.
pub fn is_string(value: &Bson) -> bool {
    matches!(value, Bson::String(_))
}

/// The value is a string of at least 2 characters.
pub fn is_string_min_2(value: &Bson) -> bool {
    matches!(value, Bson::String(s) if s.chars().count() >= 2)
}

/// The value is a string of at least 10 characters.
pub fn is_string_min_10(value: &Bson) -> bool {
    matches!(value, Bson::String(s) if s.chars().count() >= 10)
}

/// The value is a number (integer or double).
pub fn is_number(value: &Bson) -> bool {
    matches!(value, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_))
}

/// The value is a non-negative number.
pub fn is_non_negative_number(value: &Bson) -> bool {
    match value {
        Bson::Int32(n) => *n >= 0,
        Bson::Int64(n) => *n >= 0,
        Bson::Double(n) => n.is_finite() && *n >= 0.0,
        _ => false,
    }
}

/// The value is a non-negative integer (a double with no fractional part
/// qualifies — JSON has a single number type).
pub fn is_non_negative_integer(value: &Bson) -> bool {
    match value {
        Bson::Int32(n) => *n >= 0,
        Bson::Int64(n) => *n >= 0,
        Bson::Double(n) => n.is_finite() && *n >= 0.0 && n.fract() == 0.0,
        _ => false,
    }
}

/// The value is a boolean.
pub fn is_bool(value: &Bson) -> bool {
    matches!(value, Bson::Boolean(_))
}

/// The value is an embedded document.
pub fn is_document(value: &Bson) -> bool {
    matches!(value, Bson::Document(_))
}

/// The value is an array whose elements are all strings.
pub fn is_string_array(value: &Bson) -> bool {
    matches!(value, Bson::Array(items) if items.iter().all(|i| matches!(i, Bson::String(_))))
}

/// The value is a string with valid email syntax: one `@`, no whitespace,
/// and a domain containing a dot with characters on both sides.
pub fn is_email(value: &Bson) -> bool {
    matches!(value, Bson::String(s) if is_email_str(s))
}

pub(crate) fn is_email_str(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot < domain.len() - 1,
        None => false,
    }
}

/// The value is a string carrying an `http://` or `https://` URL.
pub fn is_url(value: &Bson) -> bool {
    match value {
        Bson::String(s) => {
            let rest = s
                .strip_prefix("https://")
                .or_else(|| s.strip_prefix("http://"));
            matches!(rest, Some(r) if !r.is_empty() && !r.chars().any(char::is_whitespace))
        }
        _ => false,
    }
}

/// The value is a syntactically valid store identifier: either already a
/// native identifier or a 24-hex string.
pub fn is_object_id(value: &Bson) -> bool {
    match value {
        Bson::ObjectId(_) => true,
        Bson::String(s) => id::is_valid(s),
        _ => false,
    }
}
