//! Todo Item Entity
//!
//! An item belongs to one list. Whether the item is being edited is UI state
//! and is tracked by `TodoState`, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainResult, Entity};
use super::fields::{fields, Fields, StoredDocument};
use super::ids::{ItemId, ListId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier (assigned by the store)
    pub id: ItemId,
    pub title: String,
    pub description: String,
    /// Completion status
    pub completed: bool,
    /// Owning list
    pub list_id: ListId,
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Create an open item that has not been persisted yet
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        list_id: ListId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ItemId::unassigned(),
            title: title.into(),
            description: description.into(),
            completed: false,
            list_id,
            created_at,
        }
    }
}

impl Entity for TodoItem {
    type Id = ItemId;

    const COLLECTION: &'static str = "todos";

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn with_id(self, id: ItemId) -> Self {
        Self { id, ..self }
    }

    fn to_fields(&self) -> Fields {
        fields([
            ("title", self.title.as_str().into()),
            ("description", self.description.as_str().into()),
            ("completed", self.completed.into()),
            ("listId", self.list_id.as_str().into()),
            ("createdAt", self.created_at.into()),
        ])
    }

    fn from_document(doc: &StoredDocument) -> DomainResult<Self> {
        Ok(Self {
            id: ItemId::new(doc.id.clone()),
            title: doc.string("title")?,
            description: doc.string_or_default("description")?,
            completed: doc.bool_or_default("completed")?,
            list_id: ListId::new(doc.string("listId")?),
            created_at: doc.timestamp_or_now("createdAt")?,
        })
    }
}
