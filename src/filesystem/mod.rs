//! File system boundary
//!
//! The reconciler only ever talks to a [`FileSystem`]: list note files, stat
//! them, read their text. [`LocalFileSystem`] is the on-disk implementation;
//! tests substitute an in-memory one.

use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Stat-level facts about a file. No content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub modified: SystemTime,
    pub size_bytes: u64,
}

/// Outcome of a metadata read
///
/// `NotFound` and `Unreadable` are kept apart so callers can log a permission
/// problem differently from a deleted file, even though both end up excluded
/// from the comparison.
#[derive(Debug)]
pub enum MetadataLookup {
    Found(FileMetadata),
    NotFound,
    Unreadable(io::Error),
}

/// Files found under a root, plus the parts of the tree that could not be read
///
/// Notes below an unreadable directory are missing from `paths`; `unreadable`
/// lets callers report that instead of treating them as deleted without a trace.
#[derive(Debug, Default)]
pub struct Listing {
    pub paths: Vec<PathBuf>,
    pub unreadable: Vec<(PathBuf, io::Error)>,
}

pub trait FileSystem {
    /// All files under `root` whose extension equals `extension` (no leading dot)
    ///
    /// Errors only when `root` itself cannot be resolved.
    fn list_files(&self, root: &Path, extension: &str) -> io::Result<Listing>;

    fn metadata(&self, path: &Path) -> MetadataLookup;

    fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// Real file system, walking directories with walkdir
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    ignore_patterns: Vec<glob::Pattern>,
}

impl LocalFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore_patterns(ignore_patterns: Vec<glob::Pattern>) -> Self {
        Self { ignore_patterns }
    }

}

impl FileSystem for LocalFileSystem {
    fn list_files(&self, root: &Path, extension: &str) -> io::Result<Listing> {
        let extension = extension.trim_start_matches('.');
        let root = root.canonicalize()?;

        let mut listing = Listing::default();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // An unreadable subdirectory should not hide every other note
                    warn!("Skipping unreadable entry while listing notes: {}", e);
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                    if !is_ignored(&root, &path, &self.ignore_patterns) {
                        listing.unreadable.push((path, io::Error::from(e)));
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }

            if is_ignored(&root, path, &self.ignore_patterns) {
                continue;
            }

            listing.paths.push(path.to_path_buf());
        }

        debug!(
            "Listed {} .{} files under {} ({} unreadable entries)",
            listing.paths.len(),
            extension,
            root.display(),
            listing.unreadable.len()
        );
        Ok(listing)
    }

    fn metadata(&self, path: &Path) -> MetadataLookup {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return MetadataLookup::NotFound,
            Err(e) => return MetadataLookup::Unreadable(e),
        };

        if !metadata.is_file() {
            return MetadataLookup::NotFound;
        }

        match metadata.modified() {
            Ok(modified) => MetadataLookup::Found(FileMetadata {
                modified,
                size_bytes: metadata.len(),
            }),
            Err(e) => MetadataLookup::Unreadable(e),
        }
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Comparison key for a note path: absolute, Unix-style separators
///
/// Does not touch the disk, so a key can still be built for a file that has
/// already been deleted.
pub fn path_key(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let path_str = absolute.to_string_lossy();

    if MAIN_SEPARATOR == '\\' {
        path_str.replace('\\', "/")
    } else {
        path_str.into_owned()
    }
}

/// Whether `path` matches an ignore pattern
///
/// Patterns see the path relative to `root`, so a notes root that itself sits
/// under e.g. `node_modules` is not ignored wholesale. Paths outside `root`
/// are matched as they are.
pub fn is_ignored(root: &Path, path: &Path, ignore_patterns: &[glob::Pattern]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let key = relative.to_string_lossy();
    let key = if MAIN_SEPARATOR == '\\' {
        key.replace('\\', "/")
    } else {
        key.into_owned()
    };
    ignore_patterns.iter().any(|p| p.matches(&key))
}

/// Compile glob ignore patterns, rejecting the first invalid one
pub fn compile_ignore_patterns(patterns: &[String]) -> anyhow::Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p)
                .map_err(|e| anyhow::anyhow!("Invalid glob pattern {}: {}", p, e))
        })
        .collect()
}
