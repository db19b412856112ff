// Query history operations (append-only)

use super::*;
use rusqlite::params;
use tracing::debug;

/// Escape LIKE wildcards so the prefix is matched literally
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl NoteDatabase {
    /// Append a history entry, returning its generated id
    pub fn insert_history_entry(&self, text: &str, hit_count: usize) -> StoreResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp_millis();

        self.conn.execute(
            "INSERT INTO query_history (id, query, hit_count, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, text, hit_count as i64, created_at],
        )?;

        debug!("Logged query history entry {} ({} hits)", id, hit_count);
        Ok(id)
    }

    /// Distinct history texts starting with `prefix` (ASCII case-insensitive), newest first
    pub fn find_history_by_prefix(&self, prefix: &str, limit: usize) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT query
             FROM query_history
             WHERE query LIKE ?1 ESCAPE '\\'
             GROUP BY query
             ORDER BY MAX(created_at) DESC, MAX(rowid) DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(
            params![like_prefix_pattern(prefix), limit as i64],
            |row| row.get::<_, String>(0),
        )?;

        let mut queries = Vec::new();
        for row in rows {
            queries.push(row?);
        }

        Ok(queries)
    }

    pub fn get_recent_history(&self, limit: usize) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT query
             FROM query_history
             GROUP BY query
             ORDER BY MAX(created_at) DESC, MAX(rowid) DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map([limit as i64], |row| row.get::<_, String>(0))?;

        let mut queries = Vec::new();
        for row in rows {
            queries.push(row?);
        }

        Ok(queries)
    }

    /// Full history rows for a query text, newest first
    pub fn get_history_entries(&self, text: &str) -> StoreResult<Vec<QueryHistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, query, hit_count, created_at
             FROM query_history
             WHERE query = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map([text], |row| {
            Ok(QueryHistoryEntry {
                id: row.get(0)?,
                query: row.get(1)?,
                hit_count: usize::try_from(row.get::<_, i64>(2)?).unwrap_or(0),
                created_at_ms: row.get(3)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }

        Ok(entries)
    }
}
