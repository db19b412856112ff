//! Notes Database Module - SQLite index of the notes directory
//!
//! Split into focused files: schema, migrations, note records, query history.
//! The `notes` table is the follower side of reconciliation; `notes_fts`
//! mirrors it for ranked full-text search.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::fingerprint::Fingerprint;
use crate::store::{IndexRecord, NoteStore};

mod history;
mod migrations;
mod notes;
mod schema;
pub mod types;

pub use migrations::LATEST_SCHEMA_VERSION;
pub use notes::sanitize_fts5_query;
pub use types::*;

/// The main database connection and operations
pub struct NoteDatabase {
    pub(crate) conn: Connection,
    pub(crate) file_path: PathBuf,
}

impl NoteDatabase {
    /// Open (or create) the index database and bring its schema up to date
    pub fn new<P: AsRef<Path>>(db_path: P) -> StoreResult<Self> {
        let file_path = db_path.as_ref().to_path_buf();

        info!("Initializing SQLite database at: {}", file_path.display());

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Schema(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(&file_path)?;

        // Wait up to 5 seconds for locks held by a concurrent reader or writer
        conn.busy_timeout(std::time::Duration::from_millis(5000))?;

        // WAL lets suggestion reads on another connection proceed during a sync
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        if !journal_mode.eq_ignore_ascii_case("wal") {
            warn!(
                "Journal mode '{}' active instead of WAL; readers may block during sync",
                journal_mode
            );
        }

        let mut db = Self { conn, file_path };

        // Run schema migrations BEFORE initializing schema
        db.run_migrations()?;

        db.initialize_schema()?;

        db.check_and_rebuild_fts_index()?;

        info!("Database initialized successfully");
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Probe the FTS index and rebuild it from `notes` if the probe fails
    fn check_and_rebuild_fts_index(&mut self) -> StoreResult<()> {
        let corrupted = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM notes_fts WHERE notes_fts MATCH 'probe'",
                [],
                |_| Ok(()),
            )
            .is_err();

        if corrupted {
            warn!("Detected unreadable notes_fts index - rebuilding");
            self.rebuild_notes_fts()?;
            info!("notes_fts index rebuilt successfully");
        }

        Ok(())
    }

    /// Checkpoint the WAL into the main database file
    ///
    /// Returns (busy, log, checkpointed) frame counts.
    pub fn checkpoint_wal(&mut self) -> StoreResult<(i32, i32, i32)> {
        debug!("Checkpointing WAL to prevent unbounded growth");

        let (busy, log, checkpointed) =
            self.conn
                .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })?;

        debug!(
            "WAL checkpoint complete: busy={}, log={}, checkpointed={}",
            busy, log, checkpointed
        );

        Ok((busy, log, checkpointed))
    }

    pub fn get_stats(&self) -> StoreResult<DatabaseStats> {
        let total_notes: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;

        let total_history_entries: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM query_history", [], |row| row.get(0))?;

        let db_size_mb = if let Ok(metadata) = std::fs::metadata(&self.file_path) {
            metadata.len() as f64 / (1024.0 * 1024.0)
        } else {
            0.0
        };

        Ok(DatabaseStats {
            total_notes,
            total_history_entries,
            db_size_mb,
        })
    }
}

/// Current Unix timestamp in seconds
pub(crate) fn get_unix_timestamp() -> StoreResult<i64> {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|e| StoreError::Clock(e.to_string()))
}

impl NoteStore for NoteDatabase {
    fn upsert(&mut self, record: &IndexRecord) -> StoreResult<()> {
        self.store_note(record)
    }

    fn delete(&mut self, path: &str) -> StoreResult<()> {
        self.delete_note(path)
    }

    fn list_fingerprints(&self) -> StoreResult<Vec<Fingerprint>> {
        self.get_note_fingerprints()
    }

    fn search_titles_ranked(&self, query: &str, limit: usize) -> StoreResult<Vec<String>> {
        self.search_note_titles(query, limit)
    }

    fn recent_titles(&self, limit: usize) -> StoreResult<Vec<String>> {
        self.get_recent_titles(limit)
    }

    fn search_history_by_prefix(&self, prefix: &str, limit: usize) -> StoreResult<Vec<String>> {
        self.find_history_by_prefix(prefix, limit)
    }

    fn recent_history(&self, limit: usize) -> StoreResult<Vec<String>> {
        self.get_recent_history(limit)
    }

    fn count_matches(&self, query: &str) -> StoreResult<usize> {
        self.count_note_matches(query)
    }

    fn append_history(&self, text: &str, hit_count: usize) -> StoreResult<()> {
        self.insert_history_entry(text, hit_count).map(|_| ())
    }
}
