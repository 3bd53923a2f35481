//! Firestore value encoding
//!
//! Firestore's REST API wraps each field in a one-key object naming its
//! type, e.g. `{"stringValue": "milk"}` or `{"integerValue": "3"}`.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use todo_core::domain::{FieldValue, Fields, StoredDocument};

use crate::error::{FirebaseError, FirebaseResult};

pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(t) => json!({ "timestampValue": t.to_rfc3339() }),
    }
}

pub fn encode_fields(fields: &Fields) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect();
    Value::Object(map)
}

pub fn decode_value(value: &Value) -> FirebaseResult<FieldValue> {
    let Some((kind, inner)) = value.as_object().and_then(|obj| obj.iter().next()) else {
        return Err(FirebaseError::Serialization(format!(
            "expected a typed value, got {value}"
        )));
    };

    let decoded = match kind.as_str() {
        "nullValue" => Some(FieldValue::Null),
        "booleanValue" => inner.as_bool().map(FieldValue::Bool),
        // 64-bit integers travel as strings
        "integerValue" => match inner {
            Value::String(s) => s.parse().ok().map(FieldValue::Integer),
            other => other.as_i64().map(FieldValue::Integer),
        },
        "doubleValue" => inner.as_f64().map(FieldValue::Double),
        "stringValue" => inner.as_str().map(|s| FieldValue::String(s.to_string())),
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc))),
        _ => None,
    };

    decoded.ok_or_else(|| {
        FirebaseError::Serialization(format!("unsupported or malformed {kind}: {inner}"))
    })
}

/// Last path segment of a document resource name
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Decode a Firestore `Document` resource
pub fn decode_document(doc: &Value) -> FirebaseResult<StoredDocument> {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| FirebaseError::Serialization("document without a name".into()))?;

    let mut fields = Fields::new();
    if let Some(raw) = doc.get("fields").and_then(Value::as_object) {
        for (field, value) in raw {
            match decode_value(value) {
                Ok(value) => {
                    fields.insert(field.clone(), value);
                }
                // Arrays, maps and references are never written by this app
                Err(err) => log::warn!("Skipping field {field} of {name}: {err}"),
            }
        }
    }

    Ok(StoredDocument::new(document_id(name), fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use todo_core::domain::fields;

    #[test]
    fn test_encode_uses_firestore_type_keys() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let encoded = encode_fields(&fields([
            ("title", "Buy milk".into()),
            ("completed", false.into()),
            ("count", 3i64.into()),
            ("createdAt", at.into()),
        ]));

        assert_eq!(encoded["title"], json!({ "stringValue": "Buy milk" }));
        assert_eq!(encoded["completed"], json!({ "booleanValue": false }));
        assert_eq!(encoded["count"], json!({ "integerValue": "3" }));
        assert_eq!(
            encoded["createdAt"],
            json!({ "timestampValue": "2024-05-01T12:00:00+00:00" })
        );
    }

    #[test]
    fn test_decode_server_document() {
        let doc = json!({
            "name": "projects/demo/databases/(default)/documents/todos/abc123",
            "fields": {
                "title": { "stringValue": "Buy milk" },
                "completed": { "booleanValue": true },
                "listId": { "stringValue": "l1" },
                "createdAt": { "timestampValue": "2024-05-01T12:00:00.123456Z" },
                "tags": { "arrayValue": { "values": [] } }
            },
            "createTime": "2024-05-01T12:00:00.123456Z"
        });

        let stored = decode_document(&doc).unwrap();

        assert_eq!(stored.id, "abc123");
        assert_eq!(stored.fields["title"], FieldValue::String("Buy milk".into()));
        assert_eq!(stored.fields["completed"], FieldValue::Bool(true));
        assert!(matches!(stored.fields["createdAt"], FieldValue::Timestamp(_)));
        assert!(!stored.fields.contains_key("tags"));
    }

    #[test]
    fn test_decode_integer_forms() {
        assert_eq!(
            decode_value(&json!({ "integerValue": "42" })).unwrap(),
            FieldValue::Integer(42)
        );
        assert_eq!(
            decode_value(&json!({ "integerValue": 7 })).unwrap(),
            FieldValue::Integer(7)
        );
        assert!(decode_value(&json!({ "integerValue": "x" })).is_err());
        assert!(decode_value(&json!("bare")).is_err());
    }

    #[test]
    fn test_document_without_fields_is_empty() {
        let doc = json!({ "name": "projects/p/databases/(default)/documents/Users/u1" });
        let stored = decode_document(&doc).unwrap();
        assert_eq!(stored.id, "u1");
        assert!(stored.fields.is_empty());
    }
}
