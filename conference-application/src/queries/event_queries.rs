use std::cmp::Ordering;

use tracing::error;

use conference_domain::ManagedEvent;

use crate::{AppError, AppState};

/// Persisted events in schedule order: by start time, undated events last,
/// ties broken by title.
pub async fn list_events(state: &AppState) -> Result<Vec<ManagedEvent>, AppError> {
    let mut events = state.event_store.fetch_all().await.map_err(|err| {
        error!("failed to load events: {}", err);
        AppError::from(err)
    })?;
    events.sort_by(schedule_order);
    Ok(events)
}

fn schedule_order(a: &ManagedEvent, b: &ManagedEvent) -> Ordering {
    match (a.start_time, b.start_time) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.title.cmp(&b.title))
}
