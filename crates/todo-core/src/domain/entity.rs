//! Domain Layer - Core Entity Trait
//!
//! Every persisted entity lives in one remote collection and knows how to
//! encode itself into document fields and decode itself back.

use thiserror::Error;

use super::fields::{Fields, StoredDocument};

/// Core trait for all persisted domain entities
pub trait Entity: Sized + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + AsRef<str> + From<String>;

    /// Remote collection holding documents of this entity
    const COLLECTION: &'static str;

    /// Returns the entity's unique identifier
    fn id(&self) -> &Self::Id;

    /// Returns a copy carrying the identifier assigned by the store
    fn with_id(self, id: Self::Id) -> Self;

    /// Encodes the persisted fields (the id is never part of the fields)
    fn to_fields(&self) -> Fields;

    /// Decodes an entity from a stored document
    fn from_document(doc: &StoredDocument) -> DomainResult<Self>;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Document {id} is missing field `{field}`")]
    MissingField { id: String, field: String },
    #[error("Document {id} has field `{field}` of the wrong type, expected {expected}")]
    WrongType {
        id: String,
        field: String,
        expected: &'static str,
    },
}
