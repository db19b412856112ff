// Schema migration system for database versioning

use super::*;
use rusqlite::params;
use tracing::{debug, info};

/// Current schema version - increment when adding migrations
pub const LATEST_SCHEMA_VERSION: i32 = 1;

impl NoteDatabase {
    /// Run all pending schema migrations
    pub(super) fn run_migrations(&mut self) -> StoreResult<()> {
        self.create_schema_version_table()?;

        let current_version = self.get_schema_version()?;
        let target_version = LATEST_SCHEMA_VERSION;

        if current_version >= target_version {
            debug!(
                "Database schema is up-to-date at version {}",
                current_version
            );
            return Ok(());
        }

        info!(
            "Running schema migrations: version {} -> {}",
            current_version, target_version
        );

        for version in (current_version + 1)..=target_version {
            info!("Applying migration to version {}", version);
            self.apply_migration(version)?;
            self.record_migration(version)?;
            info!("Migration to version {} completed", version);
        }

        Ok(())
    }

    fn create_schema_version_table(&self) -> StoreResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at INTEGER NOT NULL,
                description TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Get the current schema version (0 for a fresh database)
    pub fn get_schema_version(&self) -> StoreResult<i32> {
        let table_exists = self.table_exists("schema_version")?;
        if !table_exists {
            return Ok(0);
        }

        let version: i32 = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )?;

        Ok(version)
    }

    fn apply_migration(&mut self, version: i32) -> StoreResult<()> {
        match version {
            1 => self.migration_001_initial_schema()?,
            _ => {
                return Err(StoreError::Schema(format!(
                    "Unknown migration version: {}",
                    version
                )))
            }
        }
        Ok(())
    }

    fn record_migration(&self, version: i32) -> StoreResult<()> {
        let description = match version {
            1 => "Initial schema",
            _ => "Unknown migration",
        };

        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version, applied_at, description)
             VALUES (?1, ?2, ?3)",
            params![version, get_unix_timestamp()?, description],
        )?;

        Ok(())
    }

    pub fn has_column(&self, table: &str, column: &str) -> StoreResult<bool> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", table))?;

        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(columns.iter().any(|c| c == column))
    }

    fn table_exists(&self, table: &str) -> StoreResult<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Migration 001: Initial schema (version tracking only; tables come from initialize_schema)
    fn migration_001_initial_schema(&self) -> StoreResult<()> {
        Ok(())
    }
}
