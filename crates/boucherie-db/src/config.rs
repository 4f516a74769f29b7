//! # Process Configuration
//!
//! Environment-driven configuration with sensible defaults, read once at
//! startup by the binaries.

use std::path::PathBuf;

/// Default database file when `BOUCHERIE_DB` is unset.
pub const DEFAULT_DB_PATH: &str = "boucherie.db";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the SQLite database file (`BOUCHERIE_DB`).
    pub db_path: PathBuf,
}

impl AppConfig {
    /// Reads configuration from the environment.
    pub fn load() -> Self {
        let db_path = std::env::var("BOUCHERIE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        AppConfig { db_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_path() {
        // Only meaningful when the variable is not set in the test env
        if std::env::var("BOUCHERIE_DB").is_err() {
            let config = AppConfig::load();
            assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        }
    }
}
