// Note record operations

use super::*;
use rusqlite::{params, OptionalExtension};
use std::collections::HashSet;
use tracing::debug;

/// Turn free text into a safe FTS5 MATCH expression
///
/// Every run of letters/digits becomes a quoted prefix term (`"cat"*`), joined
/// with FTS5's implicit AND. Operators, quotes and punctuation never reach the
/// parser. Returns `None` when nothing searchable is left.
pub fn sanitize_fts5_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|term| !term.is_empty())
        .map(|term| format!("\"{}\"*", term))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

impl NoteDatabase {
    /// Insert or update the note stored under `record.path`
    pub fn store_note(&self, record: &IndexRecord) -> StoreResult<()> {
        let now = get_unix_timestamp()?;

        self.conn.execute(
            "INSERT INTO notes (path, title, body, modified, size, indexed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(path) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                modified = excluded.modified,
                size = excluded.size,
                indexed_at = excluded.indexed_at",
            params![
                record.path,
                record.title,
                record.body,
                record.modified_seconds,
                record.size_bytes as i64,
                now,
            ],
        )?;

        debug!("Stored note: {}", record.path);
        Ok(())
    }

    pub fn delete_note(&self, path: &str) -> StoreResult<()> {
        let count = self
            .conn
            .execute("DELETE FROM notes WHERE path = ?1", params![path])?;

        debug!("Deleted note record for: {} ({} rows affected)", path, count);
        Ok(())
    }

    pub fn get_note(&self, path: &str) -> StoreResult<Option<IndexRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT path, title, body, modified, size FROM notes WHERE path = ?1",
                params![path],
                |row| {
                    Ok(IndexRecord {
                        path: row.get(0)?,
                        title: row.get(1)?,
                        body: row.get(2)?,
                        modified_seconds: row.get(3)?,
                        size_bytes: u64::try_from(row.get::<_, i64>(4)?).unwrap_or(0),
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    pub fn get_note_fingerprints(&self) -> StoreResult<Vec<Fingerprint>> {
        let mut stmt = self
            .conn
            .prepare("SELECT path, modified, size FROM notes ORDER BY path")?;

        let rows = stmt.query_map([], |row| {
            Ok(Fingerprint::new(
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                u64::try_from(row.get::<_, i64>(2)?).unwrap_or(0),
            ))
        })?;

        let mut fingerprints = Vec::new();
        for row in rows {
            fingerprints.push(row?);
        }

        debug!("Retrieved {} note fingerprints from database", fingerprints.len());
        Ok(fingerprints)
    }

    /// Distinct titles of matching notes, BM25 order with titles weighted 10x over bodies
    pub fn search_note_titles(&self, query: &str, limit: usize) -> StoreResult<Vec<String>> {
        let Some(fts_query) = sanitize_fts5_query(query) else {
            return Ok(Vec::new());
        };
        if limit == 0 {
            return Ok(Vec::new());
        }

        debug!("FTS5 query sanitization: '{}' -> '{}'", query, fts_query);

        let mut stmt = self.conn.prepare(
            "SELECT n.title
             FROM notes_fts
             INNER JOIN notes n ON n.rowid = notes_fts.rowid
             WHERE notes_fts MATCH ?1
             ORDER BY bm25(notes_fts, 10.0, 1.0), n.modified DESC, n.path",
        )?;

        let rows = stmt.query_map([&fts_query], |row| row.get::<_, String>(0))?;

        // Rows stream lazily; stop reading once enough distinct titles are collected
        let mut seen = HashSet::new();
        let mut titles = Vec::new();
        for row in rows {
            let title = row?;
            if seen.insert(title.clone()) {
                titles.push(title);
                if titles.len() == limit {
                    break;
                }
            }
        }

        debug!("FTS5: {} distinct titles matching '{}'", titles.len(), query);
        Ok(titles)
    }

    pub fn get_recent_titles(&self, limit: usize) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT title
             FROM notes
             GROUP BY title
             ORDER BY MAX(modified) DESC, title
             LIMIT ?1",
        )?;

        let rows = stmt.query_map([limit as i64], |row| row.get::<_, String>(0))?;

        let mut titles = Vec::new();
        for row in rows {
            titles.push(row?);
        }

        Ok(titles)
    }

    pub fn count_note_matches(&self, query: &str) -> StoreResult<usize> {
        let Some(fts_query) = sanitize_fts5_query(query) else {
            return Ok(0);
        };

        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes_fts WHERE notes_fts MATCH ?1",
            [&fts_query],
            |row| row.get(0),
        )?;

        Ok(usize::try_from(count).unwrap_or(0))
    }
}
