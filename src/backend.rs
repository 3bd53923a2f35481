//! Platform selection
//!
//! Firebase when configured, otherwise the in-memory platform. The Firebase
//! session is kept in localStorage between page loads.

use std::rc::Rc;

use firebase_client::{FirebaseAuth, FirestoreStore, StoredSession};
use todo_core::repository::{DocumentStore, IdentityProvider, MemoryIdentity, MemoryStore};

use crate::config::AppConfig;

const SESSION_KEY: &str = "todo-lists.session";

#[derive(Clone)]
pub struct Backend {
    pub identity: Rc<dyn IdentityProvider>,
    pub documents: Rc<dyn DocumentStore>,
    firebase: Option<Rc<FirebaseAuth>>,
}

impl Backend {
    pub fn from_config(config: &AppConfig) -> Self {
        let Some(firebase) = config.firebase() else {
            log::warn!("Firebase is not configured; using the in-memory platform");
            return Self {
                identity: Rc::new(MemoryIdentity::new()),
                documents: Rc::new(MemoryStore::new()),
                firebase: None,
            };
        };

        log::info!("Using Firebase project {}", firebase.project_id);
        let auth = Rc::new(FirebaseAuth::new(firebase.clone()));
        auth.on_persist(Box::new(persist_session));
        let documents = Rc::new(FirestoreStore::new(firebase.clone(), Rc::clone(&auth)));
        Self {
            identity: auth.clone(),
            documents,
            firebase: Some(auth),
        }
    }

    /// Determine the initial session
    pub async fn start(&self) {
        if let Some(auth) = &self.firebase {
            auth.restore(load_session()).await;
        }
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn load_session() -> Option<StoredSession> {
    let raw = local_storage()?.get_item(SESSION_KEY).ok().flatten()?;
    serde_json::from_str(&raw)
        .inspect_err(|e| log::warn!("Ignoring unreadable stored session: {e}"))
        .ok()
}

fn persist_session(stored: Option<&StoredSession>) {
    let Some(storage) = local_storage() else {
        return;
    };
    let result = match stored {
        Some(session) => match serde_json::to_string(session) {
            Ok(raw) => storage.set_item(SESSION_KEY, &raw),
            Err(err) => {
                log::warn!("Could not encode session: {err}");
                return;
            }
        },
        None => storage.remove_item(SESSION_KEY),
    };
    if let Err(err) = result {
        log::warn!("Could not update stored session: {err:?}");
    }
}
