//! In-memory [`FileSystem`] with fixed mtimes and injectable failures

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::filesystem::{FileMetadata, FileSystem, Listing, MetadataLookup};

#[derive(Debug, Clone)]
struct MemoryFile {
    text: String,
    modified: SystemTime,
}

/// Paths are stored exactly as given, so tests should use absolute
/// Unix-style paths (`/notes/a.md`) to match [`crate::filesystem::path_key`].
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, MemoryFile>>,
    metadata_failures: Mutex<HashSet<PathBuf>>,
    read_failures: Mutex<HashSet<PathBuf>>,
    unreadable_dirs: Mutex<HashSet<PathBuf>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `text` at `path` with an mtime of `modified_secs` past the epoch
    pub fn write(&self, path: &str, text: &str, modified_secs: u64) {
        self.write_at(
            path,
            text,
            UNIX_EPOCH + Duration::from_secs(modified_secs),
        );
    }

    pub fn write_at(&self, path: &str, text: &str, modified: SystemTime) {
        self.files.lock().unwrap().insert(
            PathBuf::from(path),
            MemoryFile {
                text: text.to_string(),
                modified,
            },
        );
    }

    pub fn remove(&self, path: &str) {
        self.files.lock().unwrap().remove(Path::new(path));
    }

    /// Make `metadata` fail with PermissionDenied for `path`
    pub fn fail_metadata(&self, path: &str) {
        self.metadata_failures
            .lock()
            .unwrap()
            .insert(PathBuf::from(path));
    }

    /// Hide everything below `dir` from listings and report `dir` as unreadable
    pub fn fail_directory(&self, dir: &str) {
        self.unreadable_dirs
            .lock()
            .unwrap()
            .insert(PathBuf::from(dir));
    }

    /// Make `read_text` fail for `path` while metadata still succeeds
    pub fn fail_read(&self, path: &str) {
        self.read_failures.lock().unwrap().insert(PathBuf::from(path));
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_files(&self, root: &Path, extension: &str) -> io::Result<Listing> {
        let files = self.files.lock().unwrap();
        let unreadable_dirs = self.unreadable_dirs.lock().unwrap();

        let paths = files
            .keys()
            .filter(|p| p.starts_with(root))
            .filter(|p| !unreadable_dirs.iter().any(|dir| p.starts_with(dir)))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
            .cloned()
            .collect();

        let unreadable = unreadable_dirs
            .iter()
            .filter(|dir| dir.starts_with(root))
            .map(|dir| {
                (
                    dir.clone(),
                    io::Error::new(io::ErrorKind::PermissionDenied, "directory denied"),
                )
            })
            .collect();

        Ok(Listing { paths, unreadable })
    }

    fn metadata(&self, path: &Path) -> MetadataLookup {
        if self.metadata_failures.lock().unwrap().contains(path) {
            return MetadataLookup::Unreadable(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "metadata denied",
            ));
        }

        match self.files.lock().unwrap().get(path) {
            Some(file) => MetadataLookup::Found(FileMetadata {
                modified: file.modified,
                size_bytes: file.text.len() as u64,
            }),
            None => MetadataLookup::NotFound,
        }
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        if self.read_failures.lock().unwrap().contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read denied"));
        }

        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|file| file.text.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such note"))
    }
}
