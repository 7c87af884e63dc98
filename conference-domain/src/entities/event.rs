// Event entity
// A conference session as fetched from the API and as persisted locally

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::RemoteId;

/// One validated event from an API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub id: RemoteId,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub room: Option<String>,
    pub speakers: Vec<String>,
}

/// Wire shape of an event before normalization.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEventRecord {
    id: RemoteId,
    #[serde(alias = "name")]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "location")]
    room: Option<String>,
    #[serde(default)]
    speakers: Option<Vec<String>>,
}

impl RawEventRecord {
    /// Normalizes text fields and checks the record is usable.
    pub(crate) fn into_record(self) -> Result<EventRecord, String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("title must not be empty".to_string());
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                return Err(format!("end_time {end} precedes start_time {start}"));
            }
        }
        let speakers = self
            .speakers
            .unwrap_or_default()
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Ok(EventRecord {
            id: self.id,
            title,
            description: normalize_optional_text(self.description),
            start_time: self.start_time,
            end_time: self.end_time,
            room: normalize_optional_text(self.room),
            speakers,
        })
    }
}

/// A locally persisted event, reconciled against remote records by `remote_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedEvent {
    pub object_id: Uuid,
    pub remote_id: RemoteId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default)]
    pub speakers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ManagedEvent {
    /// Creates an empty entity for `remote_id`; fields are filled by [`ManagedEvent::apply`].
    pub fn new(remote_id: RemoteId, now: DateTime<Utc>) -> Self {
        Self {
            object_id: Uuid::new_v4(),
            remote_id,
            title: String::new(),
            description: None,
            start_time: None,
            end_time: None,
            room: None,
            speakers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copies the record's fields onto this entity. Returns `true` when any
    /// field changed; `updated_at` only moves in that case.
    pub fn apply(&mut self, record: &EventRecord, now: DateTime<Utc>) -> bool {
        let changed = self.title != record.title
            || self.description != record.description
            || self.start_time != record.start_time
            || self.end_time != record.end_time
            || self.room != record.room
            || self.speakers != record.speakers;
        if !changed {
            return false;
        }
        self.title = record.title.clone();
        self.description = record.description.clone();
        self.start_time = record.start_time;
        self.end_time = record.end_time;
        self.room = record.room.clone();
        self.speakers = record.speakers.clone();
        self.updated_at = now;
        true
    }
}

fn normalize_optional_text(value: Option<String>) -> Option<String> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => None,
    }
}
