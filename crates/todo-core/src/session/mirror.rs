//! Session Mirror
//!
//! Republishes the identity provider's session as plain state for the UI.
//! The subscription callback is the only writer.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::domain::AuthUser;
use crate::repository::IdentityProvider;

use super::broadcast::Subscription;

/// Mirrored session: who is signed in and whether we know yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub logged_in: bool,
    /// True until the provider reports the first session state
    pub loading: bool,
}

impl SessionState {
    /// Logged out, still determining
    pub fn initial() -> Self {
        Self {
            user: None,
            logged_in: false,
            loading: true,
        }
    }

    fn settled(user: Option<&AuthUser>) -> Self {
        Self {
            user: user.cloned(),
            logged_in: user.is_some(),
            loading: false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

pub struct SessionMirror {
    state: Rc<RefCell<SessionState>>,
    _subscription: Subscription,
}

impl SessionMirror {
    /// Subscribe to `provider`, calling `on_change` after every update
    pub fn attach(
        provider: &dyn IdentityProvider,
        on_change: impl Fn(&SessionState) + 'static,
    ) -> Self {
        let state = Rc::new(RefCell::new(SessionState::initial()));
        let writer = Rc::clone(&state);
        let subscription = provider.on_session_change(Box::new(move |user| {
            let next = SessionState::settled(user);
            *writer.borrow_mut() = next.clone();
            on_change(&next);
        }));

        Self {
            state,
            _subscription: subscription,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().user.clone()
    }
}
