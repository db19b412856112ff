//! Persisted store boundary
//!
//! The reconciler is the only writer of note records; the suggester reads
//! notes and appends query history. Rows come back strongly typed, never as
//! untyped columns.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StoreResult;
use crate::fingerprint::Fingerprint;

/// One indexed note, keyed by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub path: String,
    pub title: String,
    pub body: String,
    pub modified_seconds: i64,
    pub size_bytes: u64,
}

impl IndexRecord {
    /// Build the record for a freshly read file
    ///
    /// Title is the first non-blank line with any leading `#` heading markers
    /// removed, falling back to the file stem for blank notes.
    pub fn from_content(fingerprint: &Fingerprint, body: String) -> Self {
        let title = derive_title(&body)
            .unwrap_or_else(|| file_stem(&fingerprint.path));

        Self {
            path: fingerprint.path.clone(),
            title,
            body,
            modified_seconds: fingerprint.modified_seconds,
            size_bytes: fingerprint.size_bytes,
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(self.path.clone(), self.modified_seconds, self.size_bytes)
    }
}

fn derive_title(body: &str) -> Option<String> {
    body.lines()
        .map(|line| line.trim().trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

pub trait NoteStore {
    /// Insert or replace the record stored under `record.path`
    fn upsert(&mut self, record: &IndexRecord) -> StoreResult<()>;

    /// Remove the record for `path`; deleting an unknown path is not an error
    fn delete(&mut self, path: &str) -> StoreResult<()>;

    /// Follower snapshot for reconciliation
    fn list_fingerprints(&self) -> StoreResult<Vec<Fingerprint>>;

    /// Distinct titles of notes matching `query`, best rank first
    fn search_titles_ranked(&self, query: &str, limit: usize) -> StoreResult<Vec<String>>;

    /// Distinct titles, most recently modified first
    fn recent_titles(&self, limit: usize) -> StoreResult<Vec<String>>;

    /// Distinct history texts starting with `prefix`, most recent first
    fn search_history_by_prefix(&self, prefix: &str, limit: usize) -> StoreResult<Vec<String>>;

    /// Distinct history texts, most recent first
    fn recent_history(&self, limit: usize) -> StoreResult<Vec<String>>;

    /// Number of notes the full-text query currently matches
    fn count_matches(&self, query: &str) -> StoreResult<usize>;

    fn append_history(&self, text: &str, hit_count: usize) -> StoreResult<()>;
}
