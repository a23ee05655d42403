//! Runtime configuration resolved from flags, environment and defaults.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "smart-accountant";
const DB_FILE_NAME: &str = "books.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Resolved paths and levels for one CLI run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Always absolute; the logging backend refuses relative paths.
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Fills unset values from the per-user data directory.
    ///
    /// `base_dir` overrides the platform data directory (used by tests).
    pub fn resolve(
        db: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
        base_dir: Option<&Path>,
    ) -> Self {
        let app_dir = base_dir
            .map(Path::to_path_buf)
            .or_else(dirs::data_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR_NAME);

        let db_path = db.unwrap_or_else(|| app_dir.join(DB_FILE_NAME));
        let log_dir = absolutize(log_dir.unwrap_or_else(|| app_dir.join(LOG_DIR_NAME)));
        let log_level = log_level
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| smart_accountant_core::default_log_level().to_string());

        Self {
            db_path,
            log_dir,
            log_level,
        }
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}
