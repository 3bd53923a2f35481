//! Repository Layer
//!
//! Platform abstractions and their implementations.

mod document_repo;
mod memory;
mod todo_repo;
mod traits;


pub use document_repo::DocumentRepository;
pub use memory::{MemoryIdentity, MemoryStore};
pub use todo_repo::TodoRepository;
pub use traits::{DocumentRef, DocumentStore, IdentityProvider};
