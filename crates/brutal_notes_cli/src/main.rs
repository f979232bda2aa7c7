//! CLI smoke entry point.
//!
//! # Responsibility
//! - Boot the bridge against the local fallback host and load stored notes.
//! - Print a deterministic summary for quick local sanity checks.
//!
//! Usage: `brutal_notes_cli [fallback-db-path] [log-dir]`
//!
//! Logs go to `log-dir` when given, otherwise `brutal_notes_logs` under the
//! system temp directory.

use brutal_notes_core::display::{format_relative_time, truncate};
use brutal_notes_core::{
    core_version, default_log_level, init_logging, Clock, HostBridge, LoadOptions, NoteStore,
    NotesConfig, SystemClock,
};
use std::path::PathBuf;

const PREVIEW_LIMIT: usize = 5;
const TITLE_WIDTH: usize = 40;

#[tokio::main]
async fn main() {
    println!("brutal_notes_core version={}", core_version());

    let log_dir = resolve_log_dir(std::env::args_os().nth(2).map(PathBuf::from));
    match init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        Ok(()) => println!("log_dir={}", log_dir.display()),
        Err(error) => println!("init_error=logging: {error}"),
    }

    let config = NotesConfig {
        fallback_db_path: std::env::args_os().nth(1).map(PathBuf::from),
        ..NotesConfig::default()
    };

    let bridge = HostBridge::initialize(None, &config);
    println!(
        "environment={} ready={} storage={}",
        bridge.environment().as_str(),
        bridge.is_ready(),
        bridge.has_storage()
    );
    if let Some(error) = bridge.error() {
        println!("init_error={error}");
    }

    let mut store = NoteStore::new(bridge, &config);
    let outcome = store.load(LoadOptions::default().with_retries(1)).await;
    let stats = store.stats();
    println!(
        "load={outcome:?} total={} completed={} active={}",
        stats.total, stats.completed, stats.active
    );

    let now = SystemClock.now_ms();
    for note in store.notes().iter().take(PREVIEW_LIMIT) {
        println!(
            "[{}] {} ({})",
            if note.completed { "x" } else { " " },
            truncate(&note.title, TITLE_WIDTH),
            format_relative_time(note.updated_at, now)
        );
    }
}

fn resolve_log_dir(arg: Option<PathBuf>) -> PathBuf {
    match arg {
        Some(path) if path.is_absolute() => path,
        Some(path) => std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path),
        None => std::env::temp_dir().join("brutal_notes_logs"),
    }
}
