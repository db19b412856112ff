//! Stat-based file identity
//!
//! A fingerprint is path + modification time (whole seconds) + byte size, the
//! rsync-style quick check. No content is hashed, so an edit that lands in the
//! same second and keeps the byte count is invisible. Sub-second precision is
//! dropped on purpose: file systems disagree about it and a stored second value
//! must compare equal to a fresh stat of the same file.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::filesystem::{path_key, FileMetadata, FileSystem, MetadataLookup};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub path: String,
    pub modified_seconds: i64,
    pub size_bytes: u64,
}

impl Fingerprint {
    pub fn new(path: impl Into<String>, modified_seconds: i64, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            modified_seconds,
            size_bytes,
        }
    }

    pub fn from_metadata(path: impl Into<String>, metadata: &FileMetadata) -> Self {
        Self::new(
            path,
            truncate_to_seconds(metadata.modified),
            metadata.size_bytes,
        )
    }
}

/// Fingerprint lookup that keeps "missing" and "unreadable" apart
#[derive(Debug)]
pub enum Probe {
    Found(Fingerprint),
    NotFound,
    Unreadable(io::Error),
}

impl Probe {
    pub fn into_fingerprint(self) -> Option<Fingerprint> {
        match self {
            Probe::Found(fingerprint) => Some(fingerprint),
            Probe::NotFound | Probe::Unreadable(_) => None,
        }
    }
}

/// Fingerprint `path`, or `None` if its metadata cannot be read for any reason
pub fn compute<F: FileSystem + ?Sized>(path: &Path, fs: &F) -> Option<Fingerprint> {
    probe(path, fs).into_fingerprint()
}

pub fn probe<F: FileSystem + ?Sized>(path: &Path, fs: &F) -> Probe {
    match fs.metadata(path) {
        MetadataLookup::Found(metadata) => {
            Probe::Found(Fingerprint::from_metadata(path_key(path), &metadata))
        }
        MetadataLookup::NotFound => Probe::NotFound,
        MetadataLookup::Unreadable(e) => Probe::Unreadable(e),
    }
}

/// Unix epoch seconds, truncated toward zero
pub fn truncate_to_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(before_epoch) => -(before_epoch.duration().as_secs() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_truncation_discards_subsecond_precision() {
        let base = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let later_same_second = base + Duration::from_millis(999);

        assert_eq!(truncate_to_seconds(base), 1_700_000_000);
        assert_eq!(truncate_to_seconds(later_same_second), 1_700_000_000);
    }

    #[test]
    fn test_equality_needs_all_three_fields() {
        let a = Fingerprint::new("/notes/a.md", 100, 10);
        assert_eq!(a, Fingerprint::new("/notes/a.md", 100, 10));
        assert_ne!(a, Fingerprint::new("/notes/b.md", 100, 10));
        assert_ne!(a, Fingerprint::new("/notes/a.md", 101, 10));
        assert_ne!(a, Fingerprint::new("/notes/a.md", 100, 11));
    }
}
