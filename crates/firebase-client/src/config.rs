//! Project configuration
//!
//! Mirrors the web config object from the Firebase console.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    #[serde(default)]
    pub auth_domain: String,
    pub project_id: String,
    #[serde(default)]
    pub storage_bucket: String,
    #[serde(default)]
    pub messaging_sender_id: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub measurement_id: Option<String>,
    /// Base URLs; defaults to the production services
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl FirebaseConfig {
    /// Both an API key and a project id are present
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.project_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub identity_toolkit: String,
    pub secure_token: String,
    pub firestore: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            identity_toolkit: "https://identitytoolkit.googleapis.com/v1".to_string(),
            secure_token: "https://securetoken.googleapis.com/v1".to_string(),
            firestore: "https://firestore.googleapis.com/v1".to_string(),
        }
    }
}
