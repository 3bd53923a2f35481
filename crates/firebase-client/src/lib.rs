//! Firebase Client
//!
//! Email/password authentication and Cloud Firestore documents over REST,
//! implementing the platform traits from `todo-core`.

pub mod auth;
pub mod config;
pub mod error;
pub mod firestore;
mod http;
pub mod value;

pub use auth::{FirebaseAuth, PersistHook, StoredSession};
pub use config::{Endpoints, FirebaseConfig};
pub use error::{FirebaseError, FirebaseResult};
pub use firestore::FirestoreStore;
