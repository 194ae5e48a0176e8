//! # User Model
//!
//! Validation rules for user accounts. Two payload shapes reach this
//! validator: direct registrations (name/email/password) and
//! OAuth-originated records carrying a `githubId`. OAuth payloads skip the
//! required-field checks — the provider supplied the profile — but any
//! field that is present is still format-checked.
//!
//! A password is required for every non-OAuth payload. The format checks
//! apply to the plaintext, before hashing; the stored digest never passes
//! through here.

use bson::Document;
use stockroom_core::FieldError;

use crate::validate::{is_email, is_string_min_2, run_rules, FieldRule};

/// Collection the user repository operates on.
pub const COLLECTION: &str = "users";

fn is_password(value: &bson::Bson) -> bool {
    matches!(value, bson::Bson::String(s) if s.chars().count() >= 8)
}

const NAME_MESSAGE: &str = "Name must be a string with at least 2 characters";
const EMAIL_MESSAGE: &str = "Email must be a valid email address";
const PASSWORD_MESSAGE: &str = "Password must be at least 8 characters";

/// Rules for direct registration: identity fields and password required.
const REGISTRATION_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        required: true,
        check: is_string_min_2,
        message: NAME_MESSAGE,
    },
    FieldRule {
        field: "email",
        required: true,
        check: is_email,
        message: EMAIL_MESSAGE,
    },
    FieldRule {
        field: "password",
        required: true,
        check: is_password,
        message: PASSWORD_MESSAGE,
    },
];

/// Format checks with nothing required: OAuth-originated payloads and
/// partial updates.
const FORMAT_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        required: false,
        check: is_string_min_2,
        message: NAME_MESSAGE,
    },
    FieldRule {
        field: "email",
        required: false,
        check: is_email,
        message: EMAIL_MESSAGE,
    },
    FieldRule {
        field: "password",
        required: false,
        check: is_password,
        message: PASSWORD_MESSAGE,
    },
];

/// Validate a raw user payload. Empty result means acceptable.
///
/// Payloads without a `githubId` are direct registrations and must carry
/// name, email, and password.
pub fn validate(payload: &Document) -> Vec<FieldError> {
    let oauth = matches!(payload.get("githubId"), Some(v) if !matches!(v, bson::Bson::Null));
    let rules = if oauth { FORMAT_RULES } else { REGISTRATION_RULES };
    run_rules(rules, payload)
}

/// Validate a partial update payload: every present field is
/// format-checked, nothing is required.
pub fn validate_update(payload: &Document) -> Vec<FieldError> {
    run_rules(FORMAT_RULES, payload)
}
