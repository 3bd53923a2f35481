//! Typed repository over a document store
//!
//! Maps `Entity` values to documents in `T::COLLECTION`.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::domain::{Entity, FieldValue, Fields, StoredDocument};
use crate::error::PlatformResult;

use super::traits::{DocumentRef, DocumentStore};

pub struct DocumentRepository<T: Entity> {
    store: Rc<dyn DocumentStore>,
    _entity: PhantomData<T>,
}

impl<T: Entity> Clone for DocumentRepository<T> {
    fn clone(&self) -> Self {
        Self::new(Rc::clone(&self.store))
    }
}

impl<T: Entity> DocumentRepository<T> {
    pub fn new(store: Rc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Persist a new entity and return it with the store-assigned id
    pub async fn create(&self, entity: &T) -> PlatformResult<T> {
        let id = self.store.add(T::COLLECTION, entity.to_fields()).await?;
        Ok(entity.clone().with_id(T::Id::from(id)))
    }

    /// Write the entity under its own id, replacing any existing document
    pub async fn put(&self, entity: &T) -> PlatformResult<()> {
        self.store
            .set(T::COLLECTION, entity.id().as_ref(), entity.to_fields())
            .await
    }

    pub async fn find_by_id(&self, id: &T::Id) -> PlatformResult<Option<T>> {
        match self.store.get(T::COLLECTION, id.as_ref()).await? {
            Some(doc) => Ok(Some(T::from_document(&doc)?)),
            None => Ok(None),
        }
    }

    /// All entities whose `field` equals `value`
    pub async fn find_where(&self, field: &str, value: FieldValue) -> PlatformResult<Vec<T>> {
        let docs = self.store.query_eq(T::COLLECTION, field, &value).await?;
        Ok(decode_all(&docs))
    }

    /// References to every document whose `field` equals `value`, including
    /// documents that would not decode
    pub async fn refs_where(&self, field: &str, value: FieldValue) -> PlatformResult<Vec<DocumentRef>> {
        let docs = self.store.query_eq(T::COLLECTION, field, &value).await?;
        Ok(docs
            .iter()
            .map(|doc| DocumentRef::new(T::COLLECTION, doc.id.as_str()))
            .collect())
    }

    pub async fn update_fields(&self, id: &T::Id, fields: Fields) -> PlatformResult<()> {
        self.store.update(T::COLLECTION, id.as_ref(), fields).await
    }

    pub async fn delete(&self, id: &T::Id) -> PlatformResult<()> {
        self.store.delete(T::COLLECTION, id.as_ref()).await
    }

    /// Reference to the document holding entity `id`
    pub fn doc_ref(&self, id: &T::Id) -> DocumentRef {
        DocumentRef::new(T::COLLECTION, id.as_ref())
    }
}

/// Decode every document, skipping (and logging) the ones that do not fit
fn decode_all<T: Entity>(docs: &[StoredDocument]) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| {
            T::from_document(doc)
                .inspect_err(|e| log::warn!("Skipping {} document: {e}", T::COLLECTION))
                .ok()
        })
        .collect()
}
