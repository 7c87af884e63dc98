use std::sync::atomic::{AtomicU64, Ordering};

use conference_domain::ImportReport;
use serde::Serialize;

#[derive(Debug, Default)]
pub struct Metrics {
    fetch_requests: AtomicU64,
    fetch_errors: AtomicU64,
    imports: AtomicU64,
    import_errors: AtomicU64,
    events_created: AtomicU64,
    events_updated: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub fetch_requests: u64,
    pub fetch_errors: u64,
    pub imports: u64,
    pub import_errors: u64,
    pub events_created: u64,
    pub events_updated: u64,
}

impl Metrics {
    pub fn record_fetch(&self) {
        self.fetch_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_error(&self) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_import(&self, report: &ImportReport) {
        self.imports.fetch_add(1, Ordering::Relaxed);
        self.events_created
            .fetch_add(report.created as u64, Ordering::Relaxed);
        self.events_updated
            .fetch_add(report.updated as u64, Ordering::Relaxed);
    }

    pub fn record_import_error(&self) {
        self.import_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fetch_requests: self.fetch_requests.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            imports: self.imports.load(Ordering::Relaxed),
            import_errors: self.import_errors.load(Ordering::Relaxed),
            events_created: self.events_created.load(Ordering::Relaxed),
            events_updated: self.events_updated.load(Ordering::Relaxed),
        }
    }
}
