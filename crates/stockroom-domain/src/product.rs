//! # Product Model
//!
//! Validation rules for catalog products. A product references its
//! supplier through an optional `supplierId` foreign identifier which is
//! checked for syntax here and coerced by the repository — referential
//! integrity with the supplier collection is deliberately not enforced at
//! write time.

use bson::Document;
use stockroom_core::FieldError;

use crate::validate::{
    is_bool, is_document, is_non_negative_integer, is_non_negative_number, is_number,
    is_object_id, is_string, is_string_array, is_string_min_10, is_string_min_2, is_url,
    run_rules, FieldRule,
};

/// Collection the product repository operates on.
pub const COLLECTION: &str = "products";

/// Validation rule table for product payloads.
const RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        required: true,
        check: is_string_min_2,
        message: "Name must be a string with at least 2 characters",
    },
    FieldRule {
        field: "description",
        required: true,
        check: is_string_min_10,
        message: "Description must be a string with at least 10 characters",
    },
    FieldRule {
        field: "price",
        required: true,
        check: is_non_negative_number,
        message: "Price must be a positive number",
    },
    FieldRule {
        field: "discountPercentage",
        required: false,
        check: is_non_negative_number,
        message: "Discount percentage must be a positive number",
    },
    FieldRule {
        field: "stock",
        required: true,
        check: is_non_negative_integer,
        message: "Stock must be a non-negative integer",
    },
    FieldRule {
        field: "category",
        required: true,
        check: is_string,
        message: "Category must be a string",
    },
    FieldRule {
        field: "tags",
        required: false,
        check: is_string_array,
        message: "Tags must be an array of strings",
    },
    FieldRule {
        field: "dimensions",
        required: false,
        check: is_document,
        message: "Dimensions must be an object",
    },
    FieldRule {
        field: "dimensions.height",
        required: false,
        check: is_number,
        message: "dimensions.height must be a number",
    },
    FieldRule {
        field: "dimensions.width",
        required: false,
        check: is_number,
        message: "dimensions.width must be a number",
    },
    FieldRule {
        field: "dimensions.depth",
        required: false,
        check: is_number,
        message: "dimensions.depth must be a number",
    },
    FieldRule {
        field: "dimensions.unit",
        required: false,
        check: is_string,
        message: "dimensions.unit must be a string",
    },
    FieldRule {
        field: "weight",
        required: false,
        check: is_number,
        message: "Weight must be a number",
    },
    FieldRule {
        field: "supplierId",
        required: false,
        check: is_object_id,
        message: "Invalid supplier ID format",
    },
    FieldRule {
        field: "isAvailable",
        required: true,
        check: is_bool,
        message: "isAvailable must be a boolean",
    },
    FieldRule {
        field: "imageUrl",
        required: false,
        check: is_url,
        message: "Image URL must be a valid URL",
    },
];

/// Validate a raw product payload. Empty result means acceptable.
pub fn validate(payload: &Document) -> Vec<FieldError> {
    run_rules(RULES, payload)
}
