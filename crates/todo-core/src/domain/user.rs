//! User identity and profile

use serde::{Deserialize, Serialize};

use super::entity::{DomainResult, Entity};
use super::fields::{fields, Fields, StoredDocument};
use super::ids::UserId;

/// The signed-in identity as reported by the authentication platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: UserId,
    pub email: Option<String>,
}

impl AuthUser {
    pub fn new(uid: impl Into<UserId>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
        }
    }
}

/// Application-owned profile stored under the identity id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: UserId,
    pub name: String,
    pub email: String,
}

impl UserProfile {
    pub fn new(uid: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Name shown in the greeting; blank names fall back to "User"
    pub fn display_name(profile: Option<&UserProfile>) -> &str {
        profile
            .map(|p| p.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or("User")
    }
}

impl Entity for UserProfile {
    type Id = UserId;

    const COLLECTION: &'static str = "Users";

    fn id(&self) -> &UserId {
        &self.uid
    }

    fn with_id(self, uid: UserId) -> Self {
        Self { uid, ..self }
    }

    fn to_fields(&self) -> Fields {
        fields([
            ("name", self.name.as_str().into()),
            ("email", self.email.as_str().into()),
        ])
    }

    fn from_document(doc: &StoredDocument) -> DomainResult<Self> {
        Ok(Self {
            uid: UserId::new(doc.id.clone()),
            name: doc.string_or_default("name")?,
            email: doc.string_or_default("email")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let alice = UserProfile::new("u1".into(), "Alice", "a@b.com");
        let blank = UserProfile::new("u2".into(), "  ", "c@d.com");

        assert_eq!(UserProfile::display_name(Some(&alice)), "Alice");
        assert_eq!(UserProfile::display_name(Some(&blank)), "User");
        assert_eq!(UserProfile::display_name(None), "User");
    }

    #[test]
    fn test_profile_document_shape() {
        let profile = UserProfile::new("u1".into(), "Alice", "a@b.com");
        let doc = StoredDocument::new("u1", profile.to_fields());

        assert_eq!(doc.fields.len(), 2);
        assert_eq!(UserProfile::from_document(&doc).unwrap(), profile);
    }
}
