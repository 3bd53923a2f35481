//! In-memory platform
//!
//! Identity provider and document store that keep everything in the current
//! page. Used for offline mode and as the test double for the adapters.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthUser, FieldValue, Fields, StoredDocument, UserId};
use crate::error::{PlatformError, PlatformResult};
use crate::session::{SessionBroadcaster, SessionListener, Subscription};

use super::traits::{DocumentRef, DocumentStore, IdentityProvider};

/// Minimum password length enforced by the platform itself
const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    uid: UserId,
    email: String,
    password: String,
}

/// Email/password accounts held in memory
pub struct MemoryIdentity {
    /// Accounts keyed by lowercased email
    accounts: RefCell<HashMap<String, Account>>,
    broadcaster: SessionBroadcaster,
}

impl MemoryIdentity {
    /// Provider whose (empty) session is already determined
    pub fn new() -> Self {
        let identity = Self::pending();
        identity.settle();
        identity
    }

    /// Provider that has not reported a session yet; call `settle` to finish
    pub fn pending() -> Self {
        Self {
            accounts: RefCell::new(HashMap::new()),
            broadcaster: SessionBroadcaster::new(),
        }
    }

    /// Report the current session to listeners
    pub fn settle(&self) {
        self.broadcaster.publish(self.broadcaster.current());
    }

    pub fn account_count(&self) -> usize {
        self.accounts.borrow().len()
    }
}

impl Default for MemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl IdentityProvider for MemoryIdentity {
    async fn create_account(&self, email: &str, password: &str) -> PlatformResult<AuthUser> {
        let key = email.trim().to_lowercase();
        if !key.contains('@') {
            return Err(PlatformError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PlatformError::WeakPassword);
        }

        let user = {
            let mut accounts = self.accounts.borrow_mut();
            if accounts.contains_key(&key) {
                return Err(PlatformError::EmailExists);
            }
            let account = Account {
                uid: UserId::new(Uuid::new_v4().simple().to_string()),
                email: email.trim().to_string(),
                password: password.to_string(),
            };
            let user = AuthUser::new(account.uid.clone(), Some(account.email.clone()));
            accounts.insert(key, account);
            user
        };

        log::info!("created in-memory account {}", user.uid);
        self.broadcaster.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> PlatformResult<AuthUser> {
        let key = email.trim().to_lowercase();
        let user = {
            let accounts = self.accounts.borrow();
            match accounts.get(&key) {
                Some(account) if account.password == password => {
                    AuthUser::new(account.uid.clone(), Some(account.email.clone()))
                }
                _ => return Err(PlatformError::InvalidCredentials),
            }
        };

        self.broadcaster.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> PlatformResult<()> {
        self.broadcaster.publish(None);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.broadcaster.current()
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.broadcaster.subscribe(listener)
    }
}

/// Collections of documents held in memory, in insertion order
#[derive(Default)]
pub struct MemoryStore {
    collections: RefCell<HashMap<String, Vec<StoredDocument>>>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails as if the platform were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .borrow()
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn check_available(&self) -> PlatformResult<()> {
        if self.unavailable.get() {
            return Err(PlatformError::Unavailable("in-memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: &str, fields: Fields) -> PlatformResult<String> {
        self.check_available()?;
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .borrow_mut()
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument::new(id.clone(), fields));
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> PlatformResult<()> {
        self.check_available()?;
        let mut collections = self.collections.borrow_mut();
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => doc.fields = fields,
            None => docs.push(StoredDocument::new(id, fields)),
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> PlatformResult<Option<StoredDocument>> {
        self.check_available()?;
        Ok(self
            .collections
            .borrow()
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> PlatformResult<Vec<StoredDocument>> {
        self.check_available()?;
        Ok(self
            .collections
            .borrow()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.fields.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> PlatformResult<()> {
        self.check_available()?;
        let mut collections = self.collections.borrow_mut();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| PlatformError::NotFound(format!("{collection}/{id}")))?;
        doc.fields.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> PlatformResult<()> {
        self.check_available()?;
        if let Some(docs) = self.collections.borrow_mut().get_mut(collection) {
            docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }

    async fn delete_batch(&self, refs: &[DocumentRef]) -> PlatformResult<()> {
        self.check_available()?;
        let mut collections = self.collections.borrow_mut();
        for doc_ref in refs {
            if let Some(docs) = collections.get_mut(&doc_ref.collection) {
                docs.retain(|doc| doc.id != doc_ref.id);
            }
        }
        Ok(())
    }
}
