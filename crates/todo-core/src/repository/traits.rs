//! Repository Layer - Platform Traits
//!
//! Abstract interfaces to the hosted platform. Implementations can talk to
//! Firebase, keep everything in memory, etc.
//!
//! Futures are `?Send`: the browser runs everything on one thread and its
//! HTTP futures are not `Send`.

use async_trait::async_trait;

use crate::domain::{AuthUser, FieldValue, Fields, StoredDocument};
use crate::error::PlatformResult;
use crate::session::{SessionListener, Subscription};

/// Email/password identity platform
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Create an account; the new account is signed in on success
    async fn create_account(&self, email: &str, password: &str) -> PlatformResult<AuthUser>;

    async fn sign_in(&self, email: &str, password: &str) -> PlatformResult<AuthUser>;

    async fn sign_out(&self) -> PlatformResult<()>;

    /// Identity of the current session, if any
    fn current_user(&self) -> Option<AuthUser>;

    /// Subscribe to session changes; drop the returned handle to unsubscribe
    fn on_session_change(&self, listener: SessionListener) -> Subscription;
}

/// Address of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

impl DocumentRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

/// Schemaless document store organised in named collections
#[async_trait(?Send)]
pub trait DocumentStore {
    /// Insert a document under a store-assigned id and return that id
    async fn add(&self, collection: &str, fields: Fields) -> PlatformResult<String>;

    /// Create or overwrite the document at `id`
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> PlatformResult<()>;

    async fn get(&self, collection: &str, id: &str) -> PlatformResult<Option<StoredDocument>>;

    /// All documents whose `field` equals `value`, in no particular order
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> PlatformResult<Vec<StoredDocument>>;

    /// Overwrite only the given fields; the document must exist
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> PlatformResult<()>;

    /// Delete a document; deleting a missing document succeeds
    async fn delete(&self, collection: &str, id: &str) -> PlatformResult<()>;

    /// Delete several documents atomically: all of them or none
    async fn delete_batch(&self, refs: &[DocumentRef]) -> PlatformResult<()>;
}
