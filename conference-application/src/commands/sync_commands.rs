use tracing::{error, info};

use conference_domain::ImportReport;

use crate::commands::import_commands::import_from_response;
use crate::{AppError, AppState};

/// Fetches all events from the API and imports them into the store.
///
/// Fetch and import errors are returned as they were produced; nothing is
/// retried here.
pub async fn sync_events(state: &AppState) -> Result<ImportReport, AppError> {
    state.metrics.record_fetch();
    let response = match state.event_source.fetch_all_events().await {
        Ok(response) => response,
        Err(err) => {
            state.metrics.record_fetch_error();
            error!(url = %state.config.events_url(), "failed to fetch events: {}", err);
            return Err(AppError::Fetch(err));
        }
    };

    match import_from_response(state.event_store.as_ref(), &response).await {
        Ok(report) => {
            state.metrics.record_import(&report);
            info!(
                created = report.created,
                updated = report.updated,
                "event sync finished"
            );
            Ok(report)
        }
        Err(err) => {
            state.metrics.record_import_error();
            Err(AppError::Import(err))
        }
    }
}
