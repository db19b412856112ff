// Apply step: bring the index in line with the file system

use std::path::Path;
use tracing::{debug, warn};

use super::{Change, ChangeStatus, ReconcileReport};
use crate::error::{ReconcileError, SyncIssue};
use crate::filesystem::FileSystem;
use crate::store::{IndexRecord, NoteStore};

/// Apply each change to `store`, the file system always winning
///
/// - `LeftOnly`, `LeftNewer`, `RightNewer`, `Conflict`: read the file and upsert
/// - `RightOnly`: delete the record
/// - `Same`: nothing
///
/// A file that cannot be read is recorded as [`SyncIssue::ContentUnreadable`]
/// and the batch continues. A store failure stops the batch; everything
/// applied before it stays applied.
pub fn reconcile<I, F, S>(
    changes: I,
    fs: &F,
    store: &mut S,
) -> Result<ReconcileReport, ReconcileError>
where
    I: IntoIterator<Item = Change>,
    F: FileSystem + ?Sized,
    S: NoteStore + ?Sized,
{
    let mut report = ReconcileReport::default();

    for change in changes {
        let status = change.status();
        report.record_status(status);

        match status {
            ChangeStatus::Same => {}
            ChangeStatus::RightOnly => {
                store
                    .delete(change.path())
                    .map_err(|source| ReconcileError::Apply {
                        path: change.path().to_string(),
                        applied: report.applied(),
                        source,
                    })?;
                debug!("Removed {} from index (gone from disk)", change.path());
                report.deleted += 1;
            }
            ChangeStatus::LeftOnly
            | ChangeStatus::LeftNewer
            | ChangeStatus::RightNewer
            | ChangeStatus::Conflict => {
                if status == ChangeStatus::RightNewer {
                    warn!(
                        "Index is ahead of the file system for {}; overwriting from disk",
                        change.path()
                    );
                }
                if let Some(record) = read_record(&change, fs, &mut report) {
                    store
                        .upsert(&record)
                        .map_err(|source| ReconcileError::Apply {
                            path: change.path().to_string(),
                            applied: report.applied(),
                            source,
                        })?;
                    debug!("Indexed {} ({})", change.path(), status);
                    report.upserted += 1;
                }
            }
        }
    }

    Ok(report)
}

fn read_record<F: FileSystem + ?Sized>(
    change: &Change,
    fs: &F,
    report: &mut ReconcileReport,
) -> Option<IndexRecord> {
    let left = change.left()?;

    match fs.read_text(Path::new(&left.path)) {
        Ok(body) => Some(IndexRecord::from_content(left, body)),
        Err(source) => {
            warn!("Skipping {}: content unreadable ({})", left.path, source);
            report.issues.push(SyncIssue::ContentUnreadable {
                path: left.path.clone(),
                source,
            });
            None
        }
    }
}
