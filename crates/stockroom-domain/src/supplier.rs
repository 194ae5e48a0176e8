//! # Supplier Model
//!
//! Validation rules for suppliers, including the nested postal address
//! structure and the closed supplier-type enumeration.

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use stockroom_core::FieldError;

use crate::validate::{is_bool, is_document, is_email, is_string, is_string_min_2, run_rules, FieldRule};

/// Collection the supplier repository operates on.
pub const COLLECTION: &str = "suppliers";

/// Commercial classification of a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierType {
    /// Produces the goods it supplies.
    Manufacturer,
    /// Sells in bulk to resellers.
    Wholesaler,
    /// Moves goods between manufacturers and retailers.
    Distributor,
    /// Sells directly to consumers.
    Retailer,
}

impl SupplierType {
    /// Return the string representation of this supplier type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manufacturer => "manufacturer",
            Self::Wholesaler => "wholesaler",
            Self::Distributor => "distributor",
            Self::Retailer => "retailer",
        }
    }

    /// Parse a supplier type string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manufacturer" => Some(Self::Manufacturer),
            "wholesaler" => Some(Self::Wholesaler),
            "distributor" => Some(Self::Distributor),
            "retailer" => Some(Self::Retailer),
            _ => None,
        }
    }
}

impl std::fmt::Display for SupplierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_supplier_type(value: &Bson) -> bool {
    matches!(value, Bson::String(s) if SupplierType::parse(s).is_some())
}

/// Validation rule table for supplier payloads.
const RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        required: true,
        check: is_string_min_2,
        message: "Name must be a string with at least 2 characters",
    },
    FieldRule {
        field: "contactName",
        required: true,
        check: is_string,
        message: "Contact name must be a string",
    },
    FieldRule {
        field: "email",
        required: true,
        check: is_email,
        message: "Email must be a valid email address",
    },
    FieldRule {
        field: "phone",
        required: true,
        check: is_string,
        message: "Phone must be a string",
    },
    FieldRule {
        field: "address",
        required: true,
        check: is_document,
        message: "Address must be an object",
    },
    FieldRule {
        field: "address.street",
        required: true,
        check: is_string,
        message: "address.street must be a string",
    },
    FieldRule {
        field: "address.city",
        required: true,
        check: is_string,
        message: "address.city must be a string",
    },
    FieldRule {
        field: "address.state",
        required: true,
        check: is_string,
        message: "address.state must be a string",
    },
    FieldRule {
        field: "address.zipCode",
        required: true,
        check: is_string,
        message: "address.zipCode must be a string",
    },
    FieldRule {
        field: "country",
        required: true,
        check: is_string,
        message: "Country must be a string",
    },
    FieldRule {
        field: "supplierType",
        required: true,
        check: is_supplier_type,
        message: "Supplier type must be one of: manufacturer, wholesaler, distributor, retailer",
    },
    FieldRule {
        field: "paymentTerms",
        required: true,
        check: is_string,
        message: "Payment terms must be a string",
    },
    FieldRule {
        field: "isActive",
        required: true,
        check: is_bool,
        message: "isActive must be a boolean",
    },
];

/// Validate a raw supplier payload. Empty result means acceptable.
pub fn validate(payload: &Document) -> Vec<FieldError> {
    run_rules(RULES, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn valid_payload() -> Document {
        doc! {
            "name": "Acme Metals",
            "contactName": "Jo Fletcher",
            "email": "jo@acmemetals.com",
            "phone": "+1-202-555-0142",
            "address": {
                "street": "12 Forge Lane",
                "city": "Pittsburgh",
                "state": "PA",
                "zipCode": "15106",
            },
            "country": "USA",
            "supplierType": "manufacturer",
            "paymentTerms": "Net 30",
            "isActive": true,
        }
    }

    fn fields(payload: &Document) -> Vec<String> {
        validate(payload).into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate(&valid_payload()).is_empty());
    }

    #[test]
    fn test_each_required_field_reported_when_missing() {
        for field in [
            "name",
            "contactName",
            "email",
            "phone",
            "address",
            "country",
            "supplierType",
            "paymentTerms",
        ] {
            let mut payload = valid_payload();
            payload.remove(field);
            let errors = validate(&payload);
            assert!(
                errors.iter().any(|e| e.field == field),
                "missing {field} not reported: {errors:?}"
            );
        }
    }

    #[test]
    fn test_inactive_supplier_accepted() {
        let mut payload = valid_payload();
        payload.insert("isActive", false);
        assert!(validate(&payload).is_empty());
    }

    #[test]
    fn test_missing_is_active_reported() {
        let mut payload = valid_payload();
        payload.remove("isActive");
        assert_eq!(fields(&payload), vec!["isActive"]);
    }

    #[test]
    fn test_unknown_supplier_type_rejected() {
        let mut payload = valid_payload();
        payload.insert("supplierType", "importer");
        let errors = validate(&payload);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "supplierType");
        assert!(errors[0].message.contains("manufacturer"));
    }

    #[test]
    fn test_every_supplier_type_accepted() {
        for kind in ["manufacturer", "wholesaler", "distributor", "retailer"] {
            let mut payload = valid_payload();
            payload.insert("supplierType", kind);
            assert!(validate(&payload).is_empty(), "rejected {kind}");
        }
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut payload = valid_payload();
        payload.insert("email", "jo-at-acme");
        assert_eq!(fields(&payload), vec!["email"]);
    }

    #[test]
    fn test_address_subfields_required_within_address() {
        let mut payload = valid_payload();
        payload.insert("address", doc! { "street": "12 Forge Lane", "city": "Pittsburgh" });
        assert_eq!(fields(&payload), vec!["address.state", "address.zipCode"]);
    }

    #[test]
    fn test_address_must_be_object() {
        let mut payload = valid_payload();
        payload.insert("address", "12 Forge Lane, Pittsburgh PA");
        // Sub-field rules are skipped; only the object error is reported.
        assert_eq!(fields(&payload), vec!["address"]);
    }

    #[test]
    fn test_empty_address_subfield_counts_as_missing() {
        let mut payload = valid_payload();
        payload.insert(
            "address",
            doc! { "street": "", "city": "Pittsburgh", "state": "PA", "zipCode": "15106" },
        );
        assert_eq!(fields(&payload), vec!["address.street"]);
    }

    #[test]
    fn test_supplier_type_parse_round_trips() {
        for kind in [
            SupplierType::Manufacturer,
            SupplierType::Wholesaler,
            SupplierType::Distributor,
            SupplierType::Retailer,
        ] {
            assert_eq!(SupplierType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(SupplierType::parse("importer"), None);
    }
}
