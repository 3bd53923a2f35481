//! Session-change fan-out
//!
//! Identity providers publish the current identity here; listeners are
//! detached by dropping their `Subscription`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::domain::AuthUser;

/// Callback invoked with the new identity, or `None` after sign-out
pub type SessionListener = Box<dyn Fn(Option<&AuthUser>)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Rc<dyn Fn(Option<&AuthUser>)>)>,
    current: Option<AuthUser>,
    /// Whether the provider has finished determining the initial session
    determined: bool,
}

/// Single-threaded publisher of session changes
#[derive(Clone, Default)]
pub struct SessionBroadcaster {
    inner: Rc<RefCell<Listeners>>,
}

impl SessionBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// If the session has already been determined the listener is called
    /// right away with the current identity.
    pub fn subscribe(&self, listener: SessionListener) -> Subscription {
        let listener: Rc<dyn Fn(Option<&AuthUser>)> = Rc::from(listener);
        let (id, replay) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, Rc::clone(&listener)));
            let replay = inner.determined.then(|| inner.current.clone());
            (id, replay)
        };

        if let Some(current) = replay {
            listener(current.as_ref());
        }

        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Record the new identity and notify every listener
    pub fn publish(&self, user: Option<AuthUser>) {
        let listeners: Vec<_> = {
            let mut inner = self.inner.borrow_mut();
            inner.current = user.clone();
            inner.determined = true;
            inner.entries.iter().map(|(_, l)| Rc::clone(l)).collect()
        };

        log::debug!(
            "session changed: {}",
            user.as_ref().map_or("signed out", |u| u.uid.as_str())
        );
        for listener in listeners {
            listener(user.as_ref());
        }
    }

    pub fn current(&self) -> Option<AuthUser> {
        self.inner.borrow().current.clone()
    }

    pub fn is_determined(&self) -> bool {
        self.inner.borrow().determined
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

/// Handle returned by `subscribe`; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    inner: Weak<RefCell<Listeners>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_listener(hits: &Rc<Cell<u32>>) -> SessionListener {
        let hits = Rc::clone(hits);
        Box::new(move |_| hits.set(hits.get() + 1))
    }

    #[test]
    fn test_listener_not_called_before_session_is_determined() {
        let broadcaster = SessionBroadcaster::new();
        let hits = Rc::new(Cell::new(0));
        let _sub = broadcaster.subscribe(counting_listener(&hits));

        assert_eq!(hits.get(), 0);
        broadcaster.publish(None);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_late_subscriber_gets_current_identity() {
        let broadcaster = SessionBroadcaster::new();
        broadcaster.publish(Some(AuthUser::new("u1", None)));

        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let _sub = broadcaster.subscribe(Box::new(move |user| {
            *sink.borrow_mut() = user.map(|u| u.uid.to_string());
        }));

        assert_eq!(seen.borrow().as_deref(), Some("u1"));
    }

    #[test]
    fn test_dropping_subscription_stops_notifications() {
        let broadcaster = SessionBroadcaster::new();
        let hits = Rc::new(Cell::new(0));
        let sub = broadcaster.subscribe(counting_listener(&hits));
        assert_eq!(broadcaster.listener_count(), 1);

        drop(sub);
        broadcaster.publish(None);

        assert_eq!(hits.get(), 0);
        assert_eq!(broadcaster.listener_count(), 0);
    }
}
