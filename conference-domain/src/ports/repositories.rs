use async_trait::async_trait;

use crate::entities::{ManagedEvent, SaveSummary};
use crate::errors::PersistenceError;
use crate::services::EventContext;

/// Local store of managed events.
///
/// `open_context` hands out a working copy; `save` commits its changes as
/// one unit. A failed save writes nothing.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn open_context(&self) -> Result<EventContext, PersistenceError>;
    async fn save(&self, context: EventContext) -> Result<SaveSummary, PersistenceError>;
    async fn fetch_all(&self) -> Result<Vec<ManagedEvent>, PersistenceError>;
}
