//! File Watcher & Background Re-sync
//!
//! Keeps the index current while the notes directory is being edited.
//!
//! # Architecture
//!
//! The watcher uses a 2-phase processing model:
//! 1. **File System Events** → notify detects changes; relevant ones set a dirty flag
//! 2. **Background Processing** → an interval task runs a full reconciliation
//!    pass on a blocking thread whenever the flag is set
//!
//! A full pass is stat-only for unchanged notes, so bursts of events (an
//! editor writing a temp file, renaming, then touching metadata) collapse
//! into one cheap pass. Passes are serialized by the database mutex.

mod events;
pub mod filtering; // Public for tests
pub mod types;

use anyhow::{Context, Result};
use notify::Watcher;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::database::NoteDatabase;
use crate::error::ReconcileError;
use crate::filesystem::{compile_ignore_patterns, LocalFileSystem};
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::workspace::NotesWorkspace;

pub use types::WatchStats;

/// Watches a notes directory and reconciles the index after changes
pub struct NoteWatcher {
    watcher: Option<notify::RecommendedWatcher>,
    tasks: Vec<JoinHandle<()>>,
    db: Arc<StdMutex<NoteDatabase>>,
    fs: Arc<LocalFileSystem>,
    reconciler: Reconciler,
    ignore_patterns: Vec<glob::Pattern>,
    dirty: Arc<AtomicBool>,
    stats: Arc<StdMutex<WatchStats>>,
    interval: Duration,
}

impl NoteWatcher {
    pub fn new(workspace: &NotesWorkspace, db: Arc<StdMutex<NoteDatabase>>) -> Result<Self> {
        let ignore_patterns = compile_ignore_patterns(&workspace.config.ignore_patterns)?;

        Ok(Self {
            watcher: None,
            tasks: Vec::new(),
            db,
            fs: Arc::new(LocalFileSystem::with_ignore_patterns(ignore_patterns.clone())),
            reconciler: workspace.reconciler(),
            ignore_patterns,
            dirty: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(StdMutex::new(WatchStats::default())),
            interval: Duration::from_millis(workspace.config.watch_interval_ms.max(50)),
        })
    }

    /// Run one reconciliation pass now, off the async runtime
    pub async fn sync_now(&self) -> Result<ReconcileReport> {
        run_pass(
            self.db.clone(),
            self.fs.clone(),
            self.reconciler.clone(),
            self.stats.clone(),
        )
        .await
        .map_err(Into::into)
    }

    /// Start watching the notes directory for changes
    pub async fn start_watching(&mut self) -> Result<()> {
        let root = self.reconciler.root().to_path_buf();
        info!("Starting file watcher for notes: {}", root.display());

        let (tx, mut rx) = mpsc::unbounded_channel::<notify::Result<notify::Event>>();

        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Failed to send file event: {}", e);
            }
        })?;

        watcher
            .watch(&root, notify::RecursiveMode::Recursive)
            .context("Failed to start watching notes directory")?;

        self.watcher = Some(watcher);

        let extension = self.reconciler.extension().to_string();
        let ignore_patterns = self.ignore_patterns.clone();
        let dirty = self.dirty.clone();
        let event_root = root.clone();

        self.tasks.push(tokio::spawn(async move {
            debug!("File system event detector started");
            while let Some(event_result) = rx.recv().await {
                match event_result {
                    Ok(event) => {
                        if events::is_relevant(&event, &event_root, &extension, &ignore_patterns) {
                            debug!("Note change detected: {:?}", event.paths);
                            dirty.store(true, Ordering::Release);
                        }
                    }
                    Err(e) => {
                        warn!("File watcher error: {}", e);
                    }
                }
            }
        }));

        let db = self.db.clone();
        let fs = self.fs.clone();
        let reconciler = self.reconciler.clone();
        let stats = self.stats.clone();
        let dirty = self.dirty.clone();
        let period = self.interval;

        self.tasks.push(tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);

            debug!("Background sync processor started");
            loop {
                tick.tick().await;

                if !dirty.swap(false, Ordering::AcqRel) {
                    continue;
                }

                match run_pass(db.clone(), fs.clone(), reconciler.clone(), stats.clone()).await {
                    Ok(report) if report.is_noop() => debug!("Background sync: nothing to apply"),
                    Ok(report) => info!("Background sync: {}", report),
                    Err(e) => error!("Background sync failed: {}", e),
                }
            }
        }));

        info!("File watcher started successfully with background sync");
        Ok(())
    }

    pub fn stats(&self) -> WatchStats {
        lock_recovering(&self.stats).clone()
    }

    /// Stop the file watcher and its background tasks
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            info!("File watcher stopped");
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
enum PassError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Sync task panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}

async fn run_pass(
    db: Arc<StdMutex<NoteDatabase>>,
    fs: Arc<LocalFileSystem>,
    reconciler: Reconciler,
    stats: Arc<StdMutex<WatchStats>>,
) -> std::result::Result<ReconcileReport, PassError> {
    let result = tokio::task::spawn_blocking(move || {
        let mut db = lock_recovering(&db);
        reconciler.sync(fs.as_ref(), &mut *db)
    })
    .await?;

    let mut stats = lock_recovering(&stats);
    stats.passes += 1;
    match &result {
        Ok(report) => {
            stats.notes_indexed += report.upserted as u64;
            stats.notes_removed += report.deleted as u64;
        }
        Err(_) => stats.failed_passes += 1,
    }

    Ok(result?)
}

fn lock_recovering<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("Mutex poisoned, recovering: {}", poisoned);
            poisoned.into_inner()
        }
    }
}
