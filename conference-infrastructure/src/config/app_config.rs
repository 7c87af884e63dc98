use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

use conference_domain::RuntimeConfig;

use crate::config::validation::{validate_base_url, validate_events_path};

const DEFAULT_USER_AGENT: &str = concat!("conference-sync/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub events_path: String,
    pub api_token: Option<String>,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub store_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            events_path: "/api/events".to_string(),
            api_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_seconds: 15,
            store_path: "./data/events.json".to_string(),
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("CONFERENCE_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.finish(base_dir)?;
        info!(
            api_base_url = %config.api_base_url,
            events_path = %config.events_path,
            store_path = %config.store_path,
            api_token_set = config.api_token.is_some(),
            "config loaded"
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    /// Resolves paths against `base_dir`, then normalizes and validates.
    pub fn finish(&mut self, base_dir: Option<&Path>) -> Result<()> {
        self.resolve_paths(base_dir);
        self.normalize();
        self.validate()
    }

    pub fn normalize(&mut self) {
        if let Some(token) = &self.api_token {
            if token.trim().is_empty() {
                self.api_token = None;
            }
        }
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
        let events_path = self.events_path.trim();
        self.events_path = if events_path.starts_with('/') {
            events_path.to_string()
        } else {
            format!("/{}", events_path)
        };
        if self.user_agent.trim().is_empty() {
            self.user_agent = DEFAULT_USER_AGENT.to_string();
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.store_path = resolve_path(base, &self.store_path);
    }

    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.api_base_url)?;
        validate_events_path(&self.events_path)?;
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.store_path.trim().is_empty() {
            return Err(anyhow!("store_path must not be empty"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            api_base_url: self.api_base_url.clone(),
            events_path: self.events_path.clone(),
            api_token: self.api_token.clone(),
            user_agent: self.user_agent.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
            store_path: self.store_path.clone(),
        }
    }

    /// Applies `CONFERENCE_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CONFERENCE_API_BASE_URL") {
            self.api_base_url = value;
        }
        if let Some(value) = lookup("CONFERENCE_EVENTS_PATH") {
            self.events_path = value;
        }
        if let Some(value) = lookup("CONFERENCE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Some(value) = lookup("CONFERENCE_USER_AGENT") {
            self.user_agent = value;
        }
        if let Some(value) = lookup("CONFERENCE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("CONFERENCE_STORE_PATH") {
            self.store_path = value;
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
