// Import and save outcomes

use serde::{Deserialize, Serialize};

/// Per-record tally of a completed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub received: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl ImportReport {
    pub fn mutations(&self) -> usize {
        self.created + self.updated
    }
}

/// What a store wrote during one save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
}
