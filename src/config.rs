//! Embedded application configuration

use firebase_client::FirebaseConfig;
use log::LevelFilter;
use serde::Deserialize;

const APP_CONFIG: &str = include_str!("../config/app.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Absent or without an API key: run against the in-memory platform
    #[serde(default)]
    pub firebase: Option<FirebaseConfig>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            firebase: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, serde_json::Error> {
        Self::parse(APP_CONFIG)
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Firebase settings, only when they are usable
    pub fn firebase(&self) -> Option<&FirebaseConfig> {
        self.firebase.as_ref().filter(|f| f.is_configured())
    }
}
