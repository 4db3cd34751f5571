//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Decide where the catalog database lives and how logging is set up.
//!
//! # Invariants
//! - Blank or whitespace-only variables behave as unset.
//! - Resolution never fails; invalid log settings surface at `init_logging`.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Overrides the catalog database file path.
pub const DB_PATH_ENV: &str = "DATZ_DB_PATH";
/// Overrides the log level (`trace|debug|info|warn|error`).
pub const LOG_LEVEL_ENV: &str = "DATZ_LOG_LEVEL";
/// Enables file logging into the given absolute directory.
pub const LOG_DIR_ENV: &str = "DATZ_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "datz_catalog.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// `None` leaves file logging disabled.
    pub log_dir: Option<String>,
}

impl CoreConfig {
    /// Resolves configuration from `DATZ_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV),
        }
    }
}
