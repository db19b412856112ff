//! Path filtering for watcher events
//!
//! Decides which changed paths can affect the index: right extension, not
//! under an ignored pattern. No existence check, since deleted notes matter too.

use std::path::Path;

use crate::filesystem::is_ignored;

pub fn is_note_path(
    root: &Path,
    path: &Path,
    extension: &str,
    ignore_patterns: &[glob::Pattern],
) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext == extension => {}
        _ => return false,
    }

    !is_ignored(root, path, ignore_patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::compile_ignore_patterns;
    use crate::workspace::NotesConfig;

    fn default_patterns() -> Vec<glob::Pattern> {
        compile_ignore_patterns(&NotesConfig::default().ignore_patterns).unwrap()
    }

    #[test]
    fn test_extension_must_match() {
        let root = Path::new("/notes");
        assert!(is_note_path(root, Path::new("/notes/a.md"), "md", &[]));
        assert!(!is_note_path(root, Path::new("/notes/a.txt"), "md", &[]));
        assert!(!is_note_path(root, Path::new("/notes/README"), "md", &[]));
    }

    #[test]
    fn test_default_ignore_patterns_skip_data_dir() {
        let root = Path::new("/notes");
        let patterns = default_patterns();

        assert!(!is_note_path(
            root,
            Path::new("/notes/.notesync/logs/today.md"),
            "md",
            &patterns
        ));
        assert!(!is_note_path(root, Path::new("/notes/.git/x.md"), "md", &patterns));
        assert!(!is_note_path(
            root,
            Path::new("/notes/deep/.trash/old.md"),
            "md",
            &patterns
        ));
        assert!(is_note_path(
            root,
            Path::new("/notes/journal/today.md"),
            "md",
            &patterns
        ));
    }

    #[test]
    fn test_root_inside_ignored_directory_still_watched() {
        let root = Path::new("/home/me/node_modules/pkg/notes");
        let patterns = default_patterns();

        assert!(is_note_path(
            root,
            Path::new("/home/me/node_modules/pkg/notes/a.md"),
            "md",
            &patterns
        ));
        assert!(!is_note_path(
            root,
            Path::new("/home/me/node_modules/pkg/notes/node_modules/b.md"),
            "md",
            &patterns
        ));
    }
}
