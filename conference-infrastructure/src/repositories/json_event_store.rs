use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use conference_domain::{
    EventContext, EventStore, ManagedEvent, PersistenceError, RemoteId, SaveSummary,
};

/// Event store backed by a single JSON array file.
///
/// Saves are serialized through an async mutex and replace the file by
/// writing a sibling temporary file and renaming it into place, so a failed
/// save leaves the previous contents untouched.
pub struct JsonFileEventStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "events.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_events(&self) -> Result<Vec<ManagedEvent>, PersistenceError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(PersistenceError::io(format!(
                    "{}: {}",
                    self.path.display(),
                    err
                )))
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|err| {
            PersistenceError::corrupt(format!("{}: {}", self.path.display(), err))
        })
    }

    async fn write_events(&self, events: &[ManagedEvent]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| PersistenceError::io(format!("{}: {}", parent.display(), err)))?;
            }
        }
        let content = serde_json::to_vec_pretty(events)
            .map_err(|err| PersistenceError::encode(err.to_string()))?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, content)
            .await
            .map_err(|err| PersistenceError::io(format!("{}: {}", temp_path.display(), err)))?;
        if let Err(err) = fs::rename(&temp_path, &self.path).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                warn!("failed to remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(PersistenceError::io(format!(
                "{}: {}",
                self.path.display(),
                err
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for JsonFileEventStore {
    async fn open_context(&self) -> Result<EventContext, PersistenceError> {
        let events = self.read_events().await?;
        Ok(EventContext::new(events, Utc::now()))
    }

    async fn save(&self, context: EventContext) -> Result<SaveSummary, PersistenceError> {
        if !context.has_changes() {
            return Ok(SaveSummary::default());
        }
        let _guard = self.write_lock.lock().await;

        // Re-read so changes committed since the context was opened survive.
        let mut current = self.read_events().await?;
        let changes = context.into_changes();
        let mut index = current
            .iter()
            .enumerate()
            .map(|(position, event)| (event.remote_id.clone(), position))
            .collect::<HashMap<RemoteId, usize>>();

        let mut summary = SaveSummary::default();
        for entity in changes.inserted {
            match index.get(&entity.remote_id) {
                Some(&position) => {
                    // Another import created this id first; keep its identity.
                    let existing = &mut current[position];
                    let merged = ManagedEvent {
                        object_id: existing.object_id,
                        created_at: existing.created_at,
                        ..entity
                    };
                    *existing = merged;
                    summary.updated += 1;
                }
                None => {
                    index.insert(entity.remote_id.clone(), current.len());
                    current.push(entity);
                    summary.inserted += 1;
                }
            }
        }
        for entity in changes.updated {
            match index.get(&entity.remote_id) {
                Some(&position) => current[position] = entity,
                None => {
                    index.insert(entity.remote_id.clone(), current.len());
                    current.push(entity);
                }
            }
            summary.updated += 1;
        }

        self.write_events(&current).await?;
        debug!(
            path = %self.path.display(),
            inserted = summary.inserted,
            updated = summary.updated,
            total = current.len(),
            "event store saved"
        );
        Ok(summary)
    }

    async fn fetch_all(&self) -> Result<Vec<ManagedEvent>, PersistenceError> {
        self.read_events().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conference_domain::{EventRecord, RemoteId};
    use tempfile::TempDir;

    fn record(id: &str, title: &str) -> EventRecord {
        EventRecord {
            id: RemoteId::new(id),
            title: title.to_string(),
            description: None,
            start_time: None,
            end_time: None,
            room: None,
            speakers: Vec::new(),
        }
    }

    async fn upsert(store: &JsonFileEventStore, records: &[EventRecord]) -> SaveSummary {
        let mut context = store.open_context().await.expect("open context");
        let now = context.opened_at();
        for record in records {
            let (entity, created) = context.find_or_create(&record.id);
            if entity.apply(record, now) && !created {
                context.mark_updated(&record.id);
            }
        }
        store.save(context).await.expect("save")
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty_store() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonFileEventStore::new(dir.path().join("events.json"));
        assert!(store.fetch_all().await.expect("fetch").is_empty());
        assert!(store.open_context().await.expect("open").is_empty());
    }

    #[tokio::test]
    async fn saved_events_survive_reopening() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("events.json");
        let store = JsonFileEventStore::new(&path);

        let summary = upsert(&store, &[record("1", "Opening"), record("2", "Lunch")]).await;
        assert_eq!(summary, SaveSummary { inserted: 2, updated: 0 });

        let reopened = JsonFileEventStore::new(&path);
        let events = reopened.fetch_all().await.expect("fetch");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Opening");
        assert!(!reopened.temp_path().exists());
    }

    #[tokio::test]
    async fn update_keeps_object_identity() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonFileEventStore::new(dir.path().join("events.json"));
        upsert(&store, &[record("1", "Opening")]).await;
        let before = store.fetch_all().await.expect("fetch")[0].object_id;

        let summary = upsert(&store, &[record("1", "Opening Keynote")]).await;

        let events = store.fetch_all().await.expect("fetch");
        assert_eq!(summary, SaveSummary { inserted: 0, updated: 1 });
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].object_id, before);
        assert_eq!(events[0].title, "Opening Keynote");
    }

    #[tokio::test]
    async fn overlapping_contexts_do_not_duplicate_entities() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonFileEventStore::new(dir.path().join("events.json"));

        let mut first = store.open_context().await.expect("open first");
        let mut second = store.open_context().await.expect("open second");
        let now = first.opened_at();
        first.find_or_create(&RemoteId::new("7")).0.apply(&record("7", "First"), now);
        second.find_or_create(&RemoteId::new("7")).0.apply(&record("7", "Second"), now);

        store.save(first).await.expect("save first");
        let summary = store.save(second).await.expect("save second");

        let events = store.fetch_all().await.expect("fetch");
        assert_eq!(summary, SaveSummary { inserted: 0, updated: 1 });
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Second");
    }

    #[tokio::test]
    async fn context_without_changes_does_not_touch_the_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("events.json");
        let store = JsonFileEventStore::new(&path);

        let context = store.open_context().await.expect("open");
        let summary = store.save(context).await.expect("save");

        assert_eq!(summary, SaveSummary::default());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn failed_save_leaves_previous_contents() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("events.json");
        let store = JsonFileEventStore::new(&path);
        upsert(&store, &[record("1", "Opening")]).await;
        let before = std::fs::read_to_string(&path).expect("read store");

        // A directory squatting on the temp path makes the write fail.
        std::fs::create_dir(store.temp_path()).expect("block temp path");
        let mut context = store.open_context().await.expect("open");
        let now = context.opened_at();
        context
            .find_or_create(&RemoteId::new("2"))
            .0
            .apply(&record("2", "Lunch"), now);

        let err = store.save(context).await.expect_err("save must fail");

        assert!(matches!(err, PersistenceError::Io { .. }));
        assert_eq!(std::fs::read_to_string(&path).expect("read store"), before);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("events.json");
        std::fs::write(&path, "{not json").expect("write garbage");
        let store = JsonFileEventStore::new(&path);

        let err = store.open_context().await.expect_err("corrupt");
        assert!(matches!(err, PersistenceError::Corrupt { .. }));
    }
}
