use std::sync::Arc;

use async_trait::async_trait;
use conference_domain::ports::{EventSource, EventStore, HealthCheckService};
use conference_domain::{FetchError, PersistenceError};

pub struct DefaultHealthService {
    event_source: Arc<dyn EventSource>,
    event_store: Arc<dyn EventStore>,
}

impl DefaultHealthService {
    pub fn new(event_source: Arc<dyn EventSource>, event_store: Arc<dyn EventStore>) -> Self {
        Self {
            event_source,
            event_store,
        }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_api(&self) -> Result<bool, FetchError> {
        self.event_source.ping().await.map(|_| true)
    }

    async fn check_store(&self) -> Result<bool, PersistenceError> {
        self.event_store.fetch_all().await.map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::JsonFileEventStore;
    use conference_domain::ResponseObject;
    use tempfile::TempDir;

    struct DownSource;

    #[async_trait]
    impl EventSource for DownSource {
        async fn fetch_all_events(&self) -> Result<ResponseObject, FetchError> {
            Err(FetchError::transport("connection refused"))
        }

        async fn ping(&self) -> Result<(), FetchError> {
            Err(FetchError::transport("connection refused"))
        }
    }

    #[tokio::test]
    async fn reports_each_dependency_separately() {
        let dir = TempDir::new().expect("temp dir");
        let store = Arc::new(JsonFileEventStore::new(dir.path().join("events.json")));
        let health = DefaultHealthService::new(Arc::new(DownSource), store);

        assert!(health.check_store().await.expect("store check"));
        assert_eq!(
            health.check_api().await.expect_err("api down"),
            FetchError::transport("connection refused")
        );
    }

    #[tokio::test]
    async fn unreadable_store_fails_its_check() {
        let dir = TempDir::new().expect("temp dir");
        // The store path is a directory, so reading it fails.
        let store = Arc::new(JsonFileEventStore::new(dir.path()));
        let health = DefaultHealthService::new(Arc::new(DownSource), store);

        let err = health.check_store().await.expect_err("store unreadable");
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
