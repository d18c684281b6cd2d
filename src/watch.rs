use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Returns true if `file_name` is the database or a side file that only
/// changes on writes (`-wal`, `-journal`). The `-shm` index is touched by
/// readers too, so it is ignored.
fn is_db_file(file_name: &str, db_filename: &str) -> bool {
    !db_filename.is_empty()
        && file_name.starts_with(db_filename)
        && !file_name.ends_with("-shm")
}

/// Watch the database for writes made by other sessions.
///
/// The parent directory is watched because SQLite writes through side
/// files. Only content modifications are forwarded: opening and closing a
/// connection creates and removes side files without changing any rows.
/// The watcher must be kept alive for events to arrive.
pub fn watch_db(db_path: &str) -> Result<(RecommendedWatcher, Receiver<()>)> {
    let (tx, rx) = mpsc::channel();

    let db_filename = Path::new(db_path)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let Ok(event) = res else {
            return;
        };
        if !matches!(event.kind, EventKind::Modify(_)) {
            return;
        }
        let ours = event.paths.iter().any(|p| {
            p.file_name()
                .map(|f| is_db_file(&f.to_string_lossy(), &db_filename))
                .unwrap_or(false)
        });
        if ours {
            let _ = tx.send(());
        }
    })
    .context("failed to create file watcher")?;

    let path = Path::new(db_path);
    let watch_path = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    watcher
        .watch(watch_path, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", watch_path.display()))?;

    Ok((watcher, rx))
}

/// Waits for a database change event with timeout.
/// Returns true if an event was received, false on timeout.
pub fn wait_for_change(rx: &Receiver<()>, timeout: Duration) -> bool {
    rx.recv_timeout(timeout).is_ok()
}

/// Drains any pending events from the receiver.
pub fn drain_events(rx: &Receiver<()>) {
    while rx.try_recv().is_ok() {}
}
