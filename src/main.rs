//! notesync: keep a notes directory and its search index in agreement
//!
//! Commands:
//! - init: create the .notesync workspace folder in a notes directory
//! - sync: reconcile the index with the notes on disk
//! - suggest: print suggestions for a (possibly empty) query
//! - submit: log a query into the history with its hit count
//! - status: index statistics
//! - watch: keep the index in sync while notes are edited
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use notesync::watcher::NoteWatcher;
use notesync::{NotesWorkspace, Suggestion};

#[derive(Parser)]
#[command(name = "notesync")]
#[command(about = "Notes index reconciliation and query suggestions", long_about = None)]
#[command(version)]
struct Cli {
    /// Notes directory (defaults to the current directory, searched upwards)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the .notesync workspace folder and default config
    Init,

    /// Reconcile the index with the notes on disk
    Sync,

    /// Print suggestions for a query (empty query shows recent notes and searches)
    Suggest {
        #[arg(default_value = "")]
        query: String,

        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log a submitted query into the search history
    Submit { query: String },

    /// Show index statistics
    Status,

    /// Keep the index in sync until interrupted
    Watch,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let start_path = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let workspace = match cli.command {
        Commands::Init => NotesWorkspace::initialize(start_path)?,
        _ => NotesWorkspace::detect_and_load(start_path.clone())?.ok_or_else(|| {
            anyhow!(
                "No notesync workspace found at or above {} (run `notesync init`)",
                start_path.display()
            )
        })?,
    };

    let _log_guard = init_logging(&workspace.logs_path())?;
    debug!("Using workspace at {}", workspace.root.display());

    match cli.command {
        Commands::Init => {
            println!("Initialized notesync workspace in {}", workspace.data_dir.display());
            Ok(())
        }
        Commands::Sync => sync(&workspace),
        Commands::Suggest { query, json } => suggest(&workspace, &query, json),
        Commands::Submit { query } => submit(&workspace, &query),
        Commands::Status => status(&workspace),
        Commands::Watch => tokio::runtime::Runtime::new()
            .context("Failed to start async runtime")?
            .block_on(watch(&workspace)),
    }
}

/// Console output on stderr plus a daily-rolling log file in the workspace
fn init_logging(logs_dir: &Path) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("notesync=info"))
        .context("Invalid log filter")?;

    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, "notesync.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(true),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_target(true)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    Ok(file_guard)
}

fn sync(workspace: &NotesWorkspace) -> Result<()> {
    let mut db = workspace.open_database()?;
    let fs = workspace.file_system()?;

    let report = workspace
        .reconciler()
        .sync(&fs, &mut db)
        .context("Index rebuild failed")?;

    println!("{}", report);
    for issue in &report.issues {
        println!("  skipped: {}", issue);
    }
    Ok(())
}

fn suggest(workspace: &NotesWorkspace, query: &str, json: bool) -> Result<()> {
    let db = workspace.open_database()?;
    let suggestions = workspace
        .suggester()
        .suggest(query, &db)
        .context("Search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    for suggestion in &suggestions {
        match suggestion {
            Suggestion::Entry(title) => println!("entry   {}", title),
            Suggestion::Search(text) => println!("search  {}", text),
        }
    }
    Ok(())
}

fn submit(workspace: &NotesWorkspace, query: &str) -> Result<()> {
    let db = workspace.open_database()?;
    match workspace
        .suggester()
        .submit(query, &db)
        .context("Search failed")?
    {
        Some(hits) => println!("{} matching notes", hits),
        None => println!("Empty query not logged"),
    }
    Ok(())
}

fn status(workspace: &NotesWorkspace) -> Result<()> {
    let db = workspace.open_database()?;
    let stats = db.get_stats()?;

    println!("notes directory: {}", workspace.root.display());
    println!("index:           {}", db.path().display());
    println!("indexed notes:   {}", stats.total_notes);
    println!("logged queries:  {}", stats.total_history_entries);
    println!("index size:      {:.2} MB", stats.db_size_mb);
    Ok(())
}

async fn watch(workspace: &NotesWorkspace) -> Result<()> {
    let db = Arc::new(Mutex::new(workspace.open_database()?));
    let mut watcher = NoteWatcher::new(workspace, db)?;

    let report = watcher.sync_now().await.context("Index rebuild failed")?;
    info!("Initial sync: {}", report);

    watcher.start_watching().await?;
    println!("Watching {} (Ctrl-C to stop)", workspace.root.display());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    watcher.stop().await?;
    let stats = watcher.stats();
    println!(
        "{} passes ({} failed), {} notes indexed, {} removed",
        stats.passes, stats.failed_passes, stats.notes_indexed, stats.notes_removed
    );
    Ok(())
}
