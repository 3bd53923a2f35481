//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO platform dependencies.

mod entity;
mod fields;
mod ids;
mod todo_item;
mod todo_list;
mod user;

pub use entity::{DomainError, DomainResult, Entity};
pub use fields::{fields, FieldValue, Fields, StoredDocument};
pub use ids::{ItemId, ListId, UserId};
pub use todo_item::TodoItem;
pub use todo_list::TodoList;
pub use user::{AuthUser, UserProfile};
