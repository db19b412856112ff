pub mod failing_store;
pub mod memory_fs;
pub mod tempdir;

pub use failing_store::FailingStore;
pub use memory_fs::MemoryFileSystem;
pub use tempdir::unique_temp_dir;
