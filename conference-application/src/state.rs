use std::sync::Arc;

use conference_domain::ports::{EventSource, EventStore};
use conference_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_source: Arc<dyn EventSource>,
    pub event_store: Arc<dyn EventStore>,
    pub metrics: Arc<Metrics>,
}
