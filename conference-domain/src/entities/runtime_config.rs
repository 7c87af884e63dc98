// Runtime configuration shared across layers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: String,
    pub events_path: String,
    pub api_token: Option<String>,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub store_path: String,
}

impl RuntimeConfig {
    /// Full URL of the "all events" endpoint.
    pub fn events_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.events_path)
    }
}
