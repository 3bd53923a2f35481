//! Todo List Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainResult, Entity};
use super::fields::{fields, Fields, StoredDocument};
use super::ids::{ListId, UserId};

/// A named list owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoList {
    /// Unique identifier (assigned by the store)
    pub id: ListId,
    pub name: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl TodoList {
    /// Create a list that has not been persisted yet
    pub fn new(name: impl Into<String>, owner_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ListId::unassigned(),
            name: name.into(),
            owner_id,
            created_at,
        }
    }
}

impl Entity for TodoList {
    type Id = ListId;

    const COLLECTION: &'static str = "todoLists";

    fn id(&self) -> &ListId {
        &self.id
    }

    fn with_id(self, id: ListId) -> Self {
        Self { id, ..self }
    }

    fn to_fields(&self) -> Fields {
        fields([
            ("name", self.name.as_str().into()),
            ("userId", self.owner_id.as_str().into()),
            ("createdAt", self.created_at.into()),
        ])
    }

    fn from_document(doc: &StoredDocument) -> DomainResult<Self> {
        Ok(Self {
            id: ListId::new(doc.id.clone()),
            name: doc.string("name")?,
            owner_id: UserId::new(doc.string("userId")?),
            created_at: doc.timestamp_or_now("createdAt")?,
        })
    }
}
