// Database type definitions

use serde::{Deserialize, Serialize};

/// One logged query. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryHistoryEntry {
    pub id: String,
    pub query: String,
    /// Index matches at the time the query was logged
    pub hit_count: usize,
    pub created_at_ms: i64,
}

/// Database statistics for status output
#[derive(Debug, Default, Clone, Serialize)]
pub struct DatabaseStats {
    pub total_notes: i64,
    pub total_history_entries: i64,
    pub db_size_mb: f64,
}
