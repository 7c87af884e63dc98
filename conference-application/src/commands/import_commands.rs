use tracing::{debug, error, info};

use conference_domain::ports::EventStore;
use conference_domain::{ImportError, ImportReport, ResponseObject};

/// Imports `response` into existing entities where the remote id matches,
/// otherwise creates new ones, then saves every change in one commit.
///
/// The payload is validated in full before the store is opened, so a
/// malformed payload never produces a partial import. Exactly one result is
/// returned per call; save failures pass through unchanged.
pub async fn import_from_response(
    store: &dyn EventStore,
    response: &ResponseObject,
) -> Result<ImportReport, ImportError> {
    let records = response.records().map_err(|err| {
        error!("rejected malformed events payload: {}", err);
        ImportError::from(err)
    })?;

    let mut context = store.open_context().await?;
    let now = context.opened_at();
    let mut report = ImportReport {
        received: records.len(),
        ..ImportReport::default()
    };

    for record in &records {
        let (entity, created) = context.find_or_create(&record.id);
        let changed = entity.apply(record, now);
        if created {
            report.created += 1;
        } else if changed {
            context.mark_updated(&record.id);
            report.updated += 1;
        } else {
            report.unchanged += 1;
        }
    }

    if !context.has_changes() {
        debug!(received = report.received, "import produced no changes");
    }

    let summary = store.save(context).await.map_err(|err| {
        error!("failed to save imported events: {}", err);
        ImportError::from(err)
    })?;

    info!(
        received = report.received,
        created = report.created,
        updated = report.updated,
        unchanged = report.unchanged,
        inserted = summary.inserted,
        written_updates = summary.updated,
        "events imported"
    );
    Ok(report)
}
