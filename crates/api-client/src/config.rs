//! Backend endpoint configuration

use serde::{Deserialize, Serialize};

/// Deployment environment; decides direct or proxied file URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// REST base URL, e.g. `http://localhost:3000/api` or `/api` behind a proxy
    pub base_url: String,
    /// File store origin serving `/api/files/...`
    pub file_store_url: String,
    /// File store collection holding analysis photos
    pub collection_id: String,
    pub environment: Environment,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            file_store_url: "http://localhost:8090".to_string(),
            collection_id: "pbc_2982428850".to_string(),
            environment: Environment::Development,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Endpoint URL for `path` (leading slash expected)
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
