//! Reconciliation of the note index against the notes directory
//!
//! The file system is the leader and the index the follower. One pass is:
//!
//! 1. **Leader snapshot**: list note files and fingerprint each one
//! 2. **Follower snapshot**: fingerprints stored with the index records
//! 3. **Diff**: one [`Change`] per path, classified by [`ChangeStatus`]
//! 4. **Apply**: upsert or delete so the index matches the disk
//!
//! Running a second pass with no file changes in between classifies every
//! path as `Same` and writes nothing. Store mutations need `&mut` access to
//! the store, so a single store value only ever has one reconciliation
//! running against it.

mod apply;
mod change;
mod diff;

pub use apply::reconcile;
pub use change::{Change, ChangeStatus};
pub use diff::diff;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{ReconcileError, SyncIssue};
use crate::filesystem::{path_key, FileSystem};
use crate::fingerprint::{self, Fingerprint, Probe};
use crate::store::NoteStore;

/// Outcome of one apply pass
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub left_only: usize,
    pub right_only: usize,
    pub same: usize,
    pub left_newer: usize,
    pub right_newer: usize,
    pub conflict: usize,
    /// Records written to the store
    pub upserted: usize,
    /// Records removed from the store
    pub deleted: usize,
    pub issues: Vec<SyncIssue>,
}

impl ReconcileReport {
    pub(crate) fn record_status(&mut self, status: ChangeStatus) {
        match status {
            ChangeStatus::LeftOnly => self.left_only += 1,
            ChangeStatus::RightOnly => self.right_only += 1,
            ChangeStatus::Same => self.same += 1,
            ChangeStatus::LeftNewer => self.left_newer += 1,
            ChangeStatus::RightNewer => self.right_newer += 1,
            ChangeStatus::Conflict => self.conflict += 1,
        }
    }

    /// Store mutations performed
    pub fn applied(&self) -> usize {
        self.upserted + self.deleted
    }

    pub fn is_noop(&self) -> bool {
        self.applied() == 0
    }

    pub fn count(&self, status: ChangeStatus) -> usize {
        match status {
            ChangeStatus::LeftOnly => self.left_only,
            ChangeStatus::RightOnly => self.right_only,
            ChangeStatus::Same => self.same,
            ChangeStatus::LeftNewer => self.left_newer,
            ChangeStatus::RightNewer => self.right_newer,
            ChangeStatus::Conflict => self.conflict,
        }
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} indexed, {} removed, {} unchanged \
             (new {}, gone {}, newer {}, index-ahead {}, conflict {}), {} issues",
            self.upserted,
            self.deleted,
            self.same,
            self.left_only,
            self.right_only,
            self.left_newer,
            self.right_newer,
            self.conflict,
            self.issues.len()
        )
    }
}

/// Leader-side snapshot: readable fingerprints plus paths that could not be statted
#[derive(Debug, Default)]
pub struct Snapshot {
    pub fingerprints: Vec<Fingerprint>,
    pub issues: Vec<SyncIssue>,
}

/// Runs whole reconciliation passes for one notes directory
#[derive(Debug, Clone)]
pub struct Reconciler {
    root: PathBuf,
    extension: String,
}

impl Reconciler {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Fingerprint every note file under the root
    ///
    /// Files that vanish between listing and stat are skipped quietly;
    /// unreadable directories and files whose metadata errors are recorded
    /// as issues.
    pub fn scan<F: FileSystem + ?Sized>(&self, fs: &F) -> Result<Snapshot, ReconcileError> {
        let listing = fs
            .list_files(&self.root, &self.extension)
            .map_err(|source| ReconcileError::ListFiles {
                root: self.root.clone(),
                source,
            })?;

        let mut snapshot = Snapshot::default();
        for (path, source) in listing.unreadable {
            warn!(
                "Directory unreadable at {}: {} (notes below it treated as absent)",
                path.display(),
                source
            );
            snapshot.issues.push(SyncIssue::DirectoryUnreadable {
                path: path_key(&path),
                source,
            });
        }

        for path in listing.paths {
            match fingerprint::probe(&path, fs) {
                Probe::Found(fp) => snapshot.fingerprints.push(fp),
                Probe::NotFound => {
                    debug!("{} disappeared before it could be fingerprinted", path.display());
                }
                Probe::Unreadable(source) => {
                    warn!(
                        "Metadata unreadable for {}: {} (treated as absent)",
                        path.display(),
                        source
                    );
                    snapshot.issues.push(SyncIssue::MetadataUnreadable {
                        path: path_key(&path),
                        source,
                    });
                }
            }
        }

        Ok(snapshot)
    }

    /// One full pass: snapshot both sides, diff, apply
    pub fn sync<F, S>(&self, fs: &F, store: &mut S) -> Result<ReconcileReport, ReconcileError>
    where
        F: FileSystem + ?Sized,
        S: NoteStore + ?Sized,
    {
        let start = Instant::now();

        let leader = self.scan(fs)?;
        let follower = store
            .list_fingerprints()
            .map_err(ReconcileError::Snapshot)?;

        debug!(
            "Reconciling {} files against {} index records",
            leader.fingerprints.len(),
            follower.len()
        );

        let changes = diff(leader.fingerprints, follower);
        let mut report = reconcile(changes, fs, store)?;

        let mut issues = leader.issues;
        issues.append(&mut report.issues);
        report.issues = issues;

        info!(
            "Sync of {} finished in {:.2}ms: {}",
            self.root.display(),
            start.elapsed().as_secs_f64() * 1000.0,
            report
        );

        Ok(report)
    }
}
