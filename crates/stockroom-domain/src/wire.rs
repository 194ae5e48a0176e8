//! # Wire Codec — JSON ⇄ BSON
//!
//! Inbound payloads arrive as JSON and are persisted as BSON documents;
//! responses travel the other way. The conversions here are plain
//! structural mappings: no extended-JSON interpretation on the way in
//! (a client sending `{"$oid": …}` gets a document with a literal `$oid`
//! key, not a smuggled identifier), and store identifiers render as their
//! 24-hex string on the way out — the format callers use in URLs.

use bson::{Bson, Document};
use serde_json::{Map, Value};

/// Convert a JSON object into a BSON document. Returns `None` when the
/// value is not an object.
pub fn json_to_document(value: &Value) -> Option<Document> {
    match value {
        Value::Object(map) => {
            let mut doc = Document::new();
            for (key, item) in map {
                doc.insert(key.clone(), json_to_bson(item));
            }
            Some(doc)
        }
        _ => None,
    }
}

/// Convert a JSON value into BSON. Integers that fit in 64 bits stay
/// integers; every other number becomes a double.
pub fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Bson::Int64(i)
            } else {
                Bson::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => {
            let mut doc = Document::new();
            for (key, item) in map {
                doc.insert(key.clone(), json_to_bson(item));
            }
            Bson::Document(doc)
        }
    }
}

/// Convert a stored document into response JSON.
pub fn document_to_json(doc: &Document) -> Value {
    let mut map = Map::new();
    for (key, value) in doc {
        map.insert(key.clone(), bson_to_json(value));
    }
    Value::Object(map)
}

/// Convert a BSON value into response JSON. Identifiers render as their
/// 24-hex string; datetimes as ISO 8601.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(n) => Value::from(*n),
        Bson::Int64(n) => Value::from(*n),
        Bson::Double(n) => serde_json::Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
        Bson::String(s) => Value::String(s.clone()),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.to_string()),
        ),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        // Binary, decimal, and the other exotic variants never occur in
        // this system's documents; extended JSON is an acceptable rendering.
        other => serde_json::to_value(other).unwrap_or(Value::Null),
    }
}
