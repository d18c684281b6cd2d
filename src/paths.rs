//! Well-known file locations.
//!
//! Everything lives under `$HOME/.taskboard` except the cloud database,
//! which goes to the system temp directory.

use std::path::PathBuf;

/// `$HOME/.taskboard`, or `./.taskboard` when `HOME` is unset.
pub fn base_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".taskboard")
}

pub fn local_db_path() -> PathBuf {
    base_dir().join("tasks.db")
}

pub fn cloud_db_path() -> PathBuf {
    std::env::temp_dir().join("taskboard").join("tasks.db")
}

pub fn config_path() -> PathBuf {
    base_dir().join("config.toml")
}

pub fn log_path() -> PathBuf {
    base_dir().join("taskboard.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_files_share_base_dir() {
        let base = base_dir();
        assert!(local_db_path().starts_with(&base));
        assert!(config_path().starts_with(&base));
        assert!(log_path().starts_with(&base));
    }

    #[test]
    fn cloud_db_lives_in_temp_dir() {
        assert!(cloud_db_path().starts_with(std::env::temp_dir()));
        assert!(cloud_db_path().ends_with("taskboard/tasks.db"));
    }
}
