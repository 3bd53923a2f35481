//! Document Fields
//!
//! The value model shared by every document store backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult};

/// A single typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Integer(_) => "integer",
            FieldValue::Double(_) => "double",
            FieldValue::String(_) => "string",
            FieldValue::Timestamp(_) => "timestamp",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// Named fields of one document, ordered by name
pub type Fields = BTreeMap<String, FieldValue>;

/// Builds a `Fields` map from `(name, value)` pairs
pub fn fields<const N: usize>(pairs: [(&str, FieldValue); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// A document as returned by a store: its id plus fields
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Fields,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    fn field(&self, name: &str) -> DomainResult<&FieldValue> {
        self.fields.get(name).ok_or_else(|| DomainError::MissingField {
            id: self.id.clone(),
            field: name.to_string(),
        })
    }

    fn wrong_type(&self, name: &str, expected: &'static str) -> DomainError {
        DomainError::WrongType {
            id: self.id.clone(),
            field: name.to_string(),
            expected,
        }
    }

    pub fn string(&self, name: &str) -> DomainResult<String> {
        match self.field(name)? {
            FieldValue::String(s) => Ok(s.clone()),
            _ => Err(self.wrong_type(name, "string")),
        }
    }

    /// Like `string` but a missing or null field reads as empty
    pub fn string_or_default(&self, name: &str) -> DomainResult<String> {
        match self.fields.get(name) {
            None | Some(FieldValue::Null) => Ok(String::new()),
            Some(FieldValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.wrong_type(name, "string")),
        }
    }

    pub fn bool_or_default(&self, name: &str) -> DomainResult<bool> {
        match self.fields.get(name) {
            None | Some(FieldValue::Null) => Ok(false),
            Some(FieldValue::Bool(b)) => Ok(*b),
            Some(_) => Err(self.wrong_type(name, "bool")),
        }
    }

    /// Reads a timestamp, substituting "now" when the field is absent
    pub fn timestamp_or_now(&self, name: &str) -> DomainResult<DateTime<Utc>> {
        match self.fields.get(name) {
            None | Some(FieldValue::Null) => Ok(Utc::now()),
            Some(FieldValue::Timestamp(t)) => Ok(*t),
            Some(_) => Err(self.wrong_type(name, "timestamp")),
        }
    }
}
