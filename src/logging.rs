use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};

/// Log to stderr. `RUST_LOG` overrides `default_level`.
pub fn init_stderr(default_level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp_secs()
        .try_init();
}

/// Log to a file, for modes that own the terminal.
pub fn init_file(path: &Path, default_level: log::LevelFilter) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let _ = env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp_secs()
        .try_init();

    Ok(())
}
