// src/workspace/mod.rs
//! Notes Workspace Management
//!
//! A notes directory becomes a workspace once it has a `.notesync` folder:
//! - `config/notesync.toml` - configuration
//! - `db/notes.db` - SQLite index (unless overridden in config)
//! - `logs/` - daily-rolling log files

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::database::NoteDatabase;
use crate::filesystem::{compile_ignore_patterns, LocalFileSystem};
use crate::reconcile::Reconciler;
use crate::suggest::{SuggestLimits, Suggester};

/// Name of the per-workspace data folder
pub const DATA_DIR_NAME: &str = ".notesync";

/// The main notes workspace structure
#[derive(Debug, Clone)]
pub struct NotesWorkspace {
    /// Notes directory (the reconciliation leader)
    pub root: PathBuf,

    /// The .notesync directory for all workspace data
    pub data_dir: PathBuf,

    pub config: NotesConfig,
}

/// Configuration for a notes workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Version of the workspace format
    pub version: String,

    /// Note file extension, without the dot
    pub extension: String,

    /// Glob patterns skipped when listing and watching notes
    pub ignore_patterns: Vec<String>,

    /// Index database location; `~` and environment variables are expanded.
    /// Defaults to `.notesync/db/notes.db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Watcher debounce interval in milliseconds
    pub watch_interval_ms: u64,

    /// Per-source suggestion limits
    pub suggestions: SuggestLimits,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            extension: "md".to_string(),
            ignore_patterns: vec![
                "**/.notesync/**".to_string(), // Don't index our own data
                "**/.git/**".to_string(),
                "**/node_modules/**".to_string(),
                "**/.trash/**".to_string(),
            ],
            database: None,
            watch_interval_ms: 1000,
            suggestions: SuggestLimits::default(),
        }
    }
}

impl NotesWorkspace {
    /// Initialize a new workspace at the given notes directory
    ///
    /// Creates the .notesync folder structure and writes the default configuration.
    /// An existing configuration file is kept.
    pub fn initialize(root: PathBuf) -> Result<Self> {
        info!("Initializing notes workspace at: {}", root.display());

        let root = root
            .canonicalize()
            .with_context(|| format!("Notes directory not found: {}", root.display()))?;
        let data_dir = root.join(DATA_DIR_NAME);

        Self::create_folder_structure(&data_dir)?;

        let config = if Self::config_path(&data_dir).exists() {
            Self::load_config(&data_dir)?
        } else {
            let config = NotesConfig::default();
            Self::save_config(&data_dir, &config)?;
            config
        };

        info!("Notes workspace initialized successfully");
        Ok(Self {
            root,
            data_dir,
            config,
        })
    }

    /// Detect and load an existing workspace
    ///
    /// Searches up the directory tree from the given path to find a .notesync folder
    pub fn detect_and_load(start_path: PathBuf) -> Result<Option<Self>> {
        let start_path = start_path.canonicalize().unwrap_or(start_path);

        match Self::find_workspace_root(&start_path) {
            Some(data_dir) => {
                let root = data_dir
                    .parent()
                    .ok_or_else(|| anyhow!("Invalid workspace structure"))?
                    .to_path_buf();

                info!("Found existing notes workspace at: {}", root.display());

                let config = Self::load_config(&data_dir)?;
                let workspace = Self {
                    root,
                    data_dir,
                    config,
                };
                workspace.validate_structure()?;

                Ok(Some(workspace))
            }
            None => {
                debug!("No existing notes workspace found");
                Ok(None)
            }
        }
    }

    fn create_folder_structure(data_dir: &Path) -> Result<()> {
        debug!(
            "Creating .notesync folder structure at: {}",
            data_dir.display()
        );

        let folders = [
            data_dir.join("db"),
            data_dir.join("logs"),
            data_dir.join("config"),
        ];

        for folder in &folders {
            fs::create_dir_all(folder)
                .map_err(|e| anyhow!("Failed to create directory {}: {}", folder.display(), e))?;
            debug!("Created directory: {}", folder.display());
        }

        let gitignore_path = data_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(
                &gitignore_path,
                "# notesync index data - rebuilt from the notes, do not commit\n\
                *\n\
                !.gitignore\n",
            )?;
            debug!("Created .gitignore in .notesync directory");
        }

        Ok(())
    }

    fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join("config").join("notesync.toml")
    }

    /// Save workspace configuration to notesync.toml
    pub fn save_config(data_dir: &Path, config: &NotesConfig) -> Result<()> {
        let config_path = Self::config_path(data_dir);
        let toml_content = toml::to_string_pretty(config)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        fs::write(&config_path, toml_content)
            .map_err(|e| anyhow!("Failed to write config file: {}", e))?;

        debug!("Saved configuration to: {}", config_path.display());
        Ok(())
    }

    /// Load workspace configuration from notesync.toml
    pub fn load_config(data_dir: &Path) -> Result<NotesConfig> {
        let config_path = Self::config_path(data_dir);

        if !config_path.exists() {
            warn!("Configuration file not found, using defaults");
            return Ok(NotesConfig::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .map_err(|e| anyhow!("Failed to read config file: {}", e))?;

        let config: NotesConfig = toml::from_str(&config_content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;

        debug!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    fn find_workspace_root(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path.to_path_buf();

        loop {
            let data_dir = current.join(DATA_DIR_NAME);
            if data_dir.is_dir() {
                debug!("Found .notesync directory at: {}", data_dir.display());
                return Some(data_dir);
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return None,
            }
        }
    }

    /// Recreate missing folders and the config file
    pub fn validate_structure(&self) -> Result<()> {
        for dir in ["db", "logs", "config"] {
            let path = self.data_dir.join(dir);
            if !path.exists() {
                info!("Creating missing directory: {}", path.display());
                fs::create_dir_all(&path)
                    .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            }
        }

        if !Self::config_path(&self.data_dir).exists() {
            info!("Configuration file missing, creating with defaults");
            Self::save_config(&self.data_dir, &self.config)?;
        }

        Ok(())
    }

    /// Path to the SQLite index, honoring the config override
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.config.database {
            Some(raw) => {
                let expanded = shellexpand::full(raw)
                    .map_err(|e| anyhow!("Failed to expand database path {}: {}", raw, e))?;
                let path = PathBuf::from(expanded.as_ref());
                Ok(if path.is_absolute() {
                    path
                } else {
                    self.root.join(path)
                })
            }
            None => Ok(self.data_dir.join("db").join("notes.db")),
        }
    }

    pub fn logs_path(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn open_database(&self) -> Result<NoteDatabase> {
        let db_path = self.db_path()?;
        NoteDatabase::new(&db_path)
            .with_context(|| format!("Failed to open index at {}", db_path.display()))
    }

    pub fn file_system(&self) -> Result<LocalFileSystem> {
        let patterns = compile_ignore_patterns(&self.config.ignore_patterns)?;
        Ok(LocalFileSystem::with_ignore_patterns(patterns))
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.root.clone(), self.config.extension.clone())
    }

    pub fn suggester(&self) -> Suggester {
        Suggester::new(self.config.suggestions)
    }
}
