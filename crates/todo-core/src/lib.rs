//! Todo Lists Core
//!
//! Layered architecture:
//! - domain: entities and their document encoding
//! - repository: platform traits, in-memory platform, typed repositories
//! - session: session-change fan-out and the mirrored session state
//! - forms: registration and login submission
//! - state / store: local todo state and the store adapter that syncs it
//! - route: which page a session may see

pub mod domain;
pub mod error;
pub mod forms;
pub mod repository;
pub mod route;
pub mod session;
pub mod state;
pub mod store;

#[cfg(test)]
mod scenario_tests;

pub use error::{PlatformError, PlatformResult};
pub use state::TodoState;
pub use store::TodoStore;
