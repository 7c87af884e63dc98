//! In-memory stand-ins for the domain ports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use conference_domain::ports::{EventSource, EventStore};
use conference_domain::{
    EventContext, FetchError, ManagedEvent, PersistenceError, RemoteId, ResponseObject,
    RuntimeConfig, SaveSummary,
};

use crate::{AppState, Metrics};

pub(crate) fn stored_event(id: &str, title: &str) -> ManagedEvent {
    let created = Utc.with_ymd_and_hms(2015, 5, 1, 12, 0, 0).unwrap();
    let mut event = ManagedEvent::new(RemoteId::new(id), created);
    event.title = title.to_string();
    event
}

pub(crate) fn state_with(source: FakeSource, store: MemoryStore) -> AppState {
    AppState {
        config: RuntimeConfig {
            api_base_url: "http://api.test".to_string(),
            events_path: "/api/events".to_string(),
            api_token: None,
            user_agent: "conference-sync-test".to_string(),
            request_timeout_seconds: 5,
            store_path: "unused.json".to_string(),
        },
        event_source: Arc::new(source),
        event_store: Arc::new(store),
        metrics: Arc::new(Metrics::default()),
    }
}

#[derive(Clone)]
pub(crate) struct FakeSource {
    result: Result<Value, FetchError>,
    calls: Arc<Mutex<usize>>,
}

impl FakeSource {
    pub(crate) fn responding(payload: Value) -> Self {
        Self {
            result: Ok(payload),
            calls: Arc::default(),
        }
    }

    pub(crate) fn failing(error: FetchError) -> Self {
        Self {
            result: Err(error),
            calls: Arc::default(),
        }
    }

    pub(crate) async fn calls(&self) -> usize {
        *self.calls.lock().await
    }
}

#[async_trait]
impl EventSource for FakeSource {
    async fn fetch_all_events(&self) -> Result<ResponseObject, FetchError> {
        *self.calls.lock().await += 1;
        self.result.clone().map(ResponseObject::new)
    }

    async fn ping(&self) -> Result<(), FetchError> {
        self.result.clone().map(|_| ())
    }
}

#[derive(Default)]
struct StoreInner {
    events: Vec<ManagedEvent>,
    opens: usize,
    saves: usize,
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    inner: Arc<Mutex<StoreInner>>,
    failure: Option<PersistenceError>,
}

impl MemoryStore {
    pub(crate) fn with_events(events: Vec<ManagedEvent>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                events,
                ..StoreInner::default()
            })),
            failure: None,
        }
    }

    pub(crate) fn failing(error: PersistenceError) -> Self {
        Self {
            inner: Arc::default(),
            failure: Some(error),
        }
    }

    pub(crate) async fn events(&self) -> Vec<ManagedEvent> {
        self.inner.lock().await.events.clone()
    }

    pub(crate) async fn object_ids(&self) -> Vec<String> {
        let mut ids = self
            .inner
            .lock()
            .await
            .events
            .iter()
            .map(|event| event.object_id.to_string())
            .collect::<Vec<_>>();
        ids.sort();
        ids
    }

    pub(crate) async fn opens(&self) -> usize {
        self.inner.lock().await.opens
    }

    pub(crate) async fn saves(&self) -> usize {
        self.inner.lock().await.saves
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn open_context(&self) -> Result<EventContext, PersistenceError> {
        let mut inner = self.inner.lock().await;
        inner.opens += 1;
        Ok(EventContext::new(inner.events.clone(), Utc::now()))
    }

    async fn save(&self, context: EventContext) -> Result<SaveSummary, PersistenceError> {
        let mut inner = self.inner.lock().await;
        inner.saves += 1;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let changes = context.into_changes();
        let summary = SaveSummary {
            inserted: changes.inserted.len(),
            updated: changes.updated.len(),
        };
        for entity in changes.inserted.into_iter().chain(changes.updated) {
            match inner
                .events
                .iter()
                .position(|existing| existing.remote_id == entity.remote_id)
            {
                Some(index) => inner.events[index] = entity,
                None => inner.events.push(entity),
            }
        }
        Ok(summary)
    }

    async fn fetch_all(&self) -> Result<Vec<ManagedEvent>, PersistenceError> {
        Ok(self.inner.lock().await.events.clone())
    }
}
