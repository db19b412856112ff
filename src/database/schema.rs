// Database schema initialization and table creation

use super::*;
use tracing::debug;

impl NoteDatabase {
    /// Initialize the complete database schema
    pub(super) fn initialize_schema(&mut self) -> StoreResult<()> {
        debug!("Creating database schema");

        self.create_notes_table()?;
        self.create_notes_fts_table()?;
        self.create_notes_fts_triggers()?;
        self.create_query_history_table()?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Create the notes table (one row per indexed note file)
    pub(crate) fn create_notes_table(&self) -> StoreResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                path TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                modified INTEGER NOT NULL,
                size INTEGER NOT NULL,
                indexed_at INTEGER DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_modified ON notes(modified)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_title ON notes(title)",
            [],
        )?;

        debug!("Created notes table and indexes");
        Ok(())
    }

    /// External-content FTS5 table over notes(title, body)
    pub(crate) fn create_notes_fts_table(&self) -> StoreResult<()> {
        self.conn.execute(
            "CREATE VIRTUAL TABLE IF NOT EXISTS notes_fts USING fts5(
                title,
                body,
                content='notes',
                content_rowid='rowid',
                tokenize='unicode61 remove_diacritics 2'
            )",
            [],
        )?;

        debug!("Created notes_fts table");
        Ok(())
    }

    /// Keep notes_fts in step with notes
    ///
    /// Writes must go through UPDATE (upsert), not INSERT OR REPLACE: REPLACE
    /// deletes without firing the delete trigger unless recursive triggers are on.
    pub(crate) fn create_notes_fts_triggers(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "CREATE TRIGGER IF NOT EXISTS notes_ai AFTER INSERT ON notes BEGIN
                INSERT INTO notes_fts(rowid, title, body)
                VALUES (new.rowid, new.title, new.body);
             END;

             CREATE TRIGGER IF NOT EXISTS notes_ad AFTER DELETE ON notes BEGIN
                INSERT INTO notes_fts(notes_fts, rowid, title, body)
                VALUES ('delete', old.rowid, old.title, old.body);
             END;

             CREATE TRIGGER IF NOT EXISTS notes_au AFTER UPDATE ON notes BEGIN
                INSERT INTO notes_fts(notes_fts, rowid, title, body)
                VALUES ('delete', old.rowid, old.title, old.body);
                INSERT INTO notes_fts(rowid, title, body)
                VALUES (new.rowid, new.title, new.body);
             END;",
        )?;

        debug!("Created notes_fts triggers");
        Ok(())
    }

    /// Append-only log of submitted queries
    pub(crate) fn create_query_history_table(&self) -> StoreResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS query_history (
                id TEXT PRIMARY KEY,
                query TEXT NOT NULL,
                hit_count INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_query_history_created ON query_history(created_at)",
            [],
        )?;

        debug!("Created query_history table and indexes");
        Ok(())
    }

    /// Drop and repopulate notes_fts from the notes table
    pub(crate) fn rebuild_notes_fts(&mut self) -> StoreResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute_batch(
            "DROP TRIGGER IF EXISTS notes_ai;
             DROP TRIGGER IF EXISTS notes_ad;
             DROP TRIGGER IF EXISTS notes_au;
             DROP TABLE IF EXISTS notes_fts;",
        )?;
        tx.commit()?;

        self.create_notes_fts_table()?;
        self.create_notes_fts_triggers()?;
        self.conn
            .execute("INSERT INTO notes_fts(notes_fts) VALUES('rebuild')", [])?;

        Ok(())
    }
}
