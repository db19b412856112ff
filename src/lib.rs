// notesync - file-backed notes index
//!
//! Notes live as files on disk; a SQLite index mirrors them for search.
//! This crate keeps the two in agreement and turns the index plus a
//! query-history log into ranked suggestions.
//!
//! - [`fingerprint`]: stat-only identity of a note file
//! - [`reconcile`]: diff file system against index, apply leader-wins
//! - [`suggest`]: merge title matches and past queries into one list

pub mod database;
pub mod error;
pub mod filesystem;
pub mod fingerprint;
pub mod reconcile;
pub mod store;
pub mod suggest;
pub mod watcher;
pub mod workspace;

#[cfg(test)]
pub mod tests;

// Re-export common types
pub use database::NoteDatabase;
pub use error::{ReconcileError, StoreError, SuggestError, SyncIssue};
pub use filesystem::{FileSystem, LocalFileSystem};
pub use fingerprint::Fingerprint;
pub use reconcile::{Change, ChangeStatus, ReconcileReport, Reconciler};
pub use store::{IndexRecord, NoteStore};
pub use suggest::{Suggester, Suggestion};
pub use workspace::{NotesConfig, NotesWorkspace};
