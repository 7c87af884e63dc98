use async_trait::async_trait;

use crate::entities::ResponseObject;
use crate::errors::{FetchError, PersistenceError};

/// Remote source of the event listing.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// GETs all events. Resolves once, with the decoded payload or the error.
    async fn fetch_all_events(&self) -> Result<ResponseObject, FetchError>;
    async fn ping(&self) -> Result<(), FetchError>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_api(&self) -> Result<bool, FetchError>;
    async fn check_store(&self) -> Result<bool, PersistenceError>;
}
