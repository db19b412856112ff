//! Error types for the notes index
//!
//! Each caller-facing channel has its own enum so a front end can tell
//! "index rebuild failed" ([`ReconcileError`]) apart from "search failed"
//! ([`SuggestError`]). Per-path problems that must not abort a batch are
//! collected as [`SyncIssue`]s instead of being returned.

use std::path::PathBuf;
use thiserror::Error;

/// Failure inside a [`crate::store::NoteStore`] implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("System time error: {0}")]
    Clock(String),
}

/// Non-fatal problem with a single path, recorded in the reconcile report
#[derive(Debug, Error)]
pub enum SyncIssue {
    /// Metadata could not be read; the path is treated as absent for diffing,
    /// which makes an unreadable note look deleted from disk.
    #[error("Metadata unreadable for {path}: {source}")]
    MetadataUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A directory under the root could not be listed. Notes below it are
    /// missing from the file-system snapshot and so look deleted.
    #[error("Directory unreadable at {path}: {source}")]
    DirectoryUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file vanished or became unreadable between fingerprinting and the
    /// content read. Only that change is skipped.
    #[error("Content unreadable for {path}: {source}")]
    ContentUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SyncIssue {
    pub fn path(&self) -> &str {
        match self {
            SyncIssue::MetadataUnreadable { path, .. } => path,
            SyncIssue::DirectoryUnreadable { path, .. } => path,
            SyncIssue::ContentUnreadable { path, .. } => path,
        }
    }
}

/// Index rebuild failure
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Failed to list notes under {}: {source}", root.display())]
    ListFiles {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read index fingerprints: {0}")]
    Snapshot(#[source] StoreError),

    /// A store write failed. Changes applied before it stay applied.
    #[error("Failed to apply change for {path} after {applied} applied changes: {source}")]
    Apply {
        path: String,
        applied: usize,
        #[source]
        source: StoreError,
    },
}

/// Suggestion or query-history failure
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("Search failed: {0}")]
    Store(#[from] StoreError),
}

/// Invalid [`crate::reconcile::Change`] construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChangeError {
    #[error("Change sides refer to different paths: {left} vs {right}")]
    PathMismatch { left: String, right: String },

    #[error("Change has neither a file-system nor an index side")]
    Empty,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
