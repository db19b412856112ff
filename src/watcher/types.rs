//! Type definitions for watcher statistics

use serde::Serialize;

/// Running totals across background reconciliation passes
#[derive(Debug, Clone, Default, Serialize)]
pub struct WatchStats {
    pub passes: u64,
    pub failed_passes: u64,
    pub notes_indexed: u64,
    pub notes_removed: u64,
}
