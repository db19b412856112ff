//! File system event classification
//!
//! The watcher does not apply individual events. Any relevant create, modify
//! or remove only marks the workspace dirty; the next reconciliation pass
//! works out what actually changed.

use notify::{Event, EventKind};
use std::path::Path;
use tracing::debug;

use super::filtering::is_note_path;

/// Whether `event` touches at least one note file
pub fn is_relevant(
    event: &Event,
    root: &Path,
    extension: &str,
    ignore_patterns: &[glob::Pattern],
) -> bool {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => event
            .paths
            .iter()
            .any(|path| is_note_path(root, path, extension, ignore_patterns)),
        _ => {
            debug!("Ignoring event kind: {:?}", event.kind);
            false
        }
    }
}
