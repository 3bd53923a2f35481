//! Session Layer
//!
//! Session-change fan-out for identity providers and the mirrored state
//! consumed by the UI.

mod broadcast;
mod mirror;

pub use broadcast::{SessionBroadcaster, SessionListener, Subscription};
pub use mirror::{SessionMirror, SessionState};
