//! Identifier newtypes
//!
//! Store-assigned ids are opaque strings; wrapping them keeps list ids,
//! item ids and user ids from being mixed up.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Placeholder used before the store has assigned an id
            pub fn unassigned() -> Self {
                Self(String::new())
            }

            pub fn is_assigned(&self) -> bool {
                !self.0.is_empty()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identity id issued by the authentication platform
    UserId
);
string_id!(
    /// Id of a todo list document
    ListId
);
string_id!(
    /// Id of a todo item document
    ItemId
);
