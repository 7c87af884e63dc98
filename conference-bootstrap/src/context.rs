use std::sync::Arc;

use anyhow::Result;

use conference_application::{AppState, Metrics};
use conference_domain::ports::HealthCheckService;
use conference_infrastructure::{AppConfig, DefaultHealthService, HttpEventSource, JsonFileEventStore};

pub struct AppContext {
    pub state: AppState,
    pub health: Arc<dyn HealthCheckService>,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();

        let event_source = Arc::new(HttpEventSource::from_config(&runtime_config)?);
        let event_store = Arc::new(JsonFileEventStore::new(&runtime_config.store_path));
        let health = Arc::new(DefaultHealthService::new(
            event_source.clone(),
            event_store.clone(),
        ));

        let state = AppState {
            config: runtime_config,
            event_source,
            event_store,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state, health })
    }
}
