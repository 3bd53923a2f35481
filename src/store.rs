//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_core::domain::UserProfile;
use todo_core::session::SessionState;
use todo_core::TodoState;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Store)]
pub struct AppState {
    /// Mirrored session; written only by the session listener
    pub session: SessionState,
    /// Profile of the signed-in user, for the greeting
    pub profile: Option<UserProfile>,
    /// Latest snapshot pushed by the todo store
    pub todos: TodoState,
    /// True until the first profile/list fetch after sign-in completes
    pub loading_todos: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: SessionState::initial(),
            profile: None,
            todos: TodoState::default(),
            loading_todos: true,
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}
